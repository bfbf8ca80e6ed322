//! Chronotrack CLI
//!
//! Terminal front end over the application layer: timer, clients, projects,
//! entries, boards, reports, activity and the admin console.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod config;

use app::App;
use commands::{activity, admin, auth, boards, clients, entries, profile, projects, report, timer};
use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "chronotrack")]
#[command(about = "Track work time against projects and clients", long_about = None)]
struct Args {
    /// Log level filter
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save backend coordinates to the config file
    Configure {
        base_url: String,
        api_key: String,
    },
    /// Sign in and cache the session
    Login {
        email: String,
        /// Falls back to CHRONOTRACK_PASSWORD
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear the cached session
    Logout,
    /// Start, stop, pause, resume or inspect the timer
    Timer {
        #[command(subcommand)]
        command: timer::TimerCommand,
    },
    /// Manage clients
    Clients {
        #[command(subcommand)]
        command: clients::ClientsCommand,
    },
    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: projects::ProjectsCommand,
    },
    /// Manage time entries by hand
    Entries {
        #[command(subcommand)]
        command: entries::EntriesCommand,
    },
    /// Manage task boards
    Boards {
        #[command(subcommand)]
        command: boards::BoardsCommand,
    },
    /// Time report for a window
    Report(report::ReportArgs),
    /// Your activity feed
    Activity(activity::ActivityArgs),
    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommand,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .init();

    match args.command {
        // Configure must work before any backend coordinates exist
        Command::Configure { base_url, api_key } => auth::configure(base_url, api_key),
        command => {
            let config = CliConfig::load()?;
            let app = App::new(&config);
            match command {
                Command::Configure { .. } => unreachable!(),
                Command::Login { email, password } => auth::login(&app, email, password).await,
                Command::Logout => auth::logout(&app).await,
                Command::Timer { command } => timer::run(&app, command).await,
                Command::Clients { command } => clients::run(&app, command).await,
                Command::Projects { command } => projects::run(&app, command).await,
                Command::Entries { command } => entries::run(&app, command).await,
                Command::Boards { command } => boards::run(&app, command).await,
                Command::Report(report_args) => report::run(&app, report_args).await,
                Command::Activity(activity_args) => activity::run(&app, activity_args).await,
                Command::Profile { command } => profile::run(&app, command).await,
                Command::Admin { command } => admin::run(&app, command).await,
            }
        }
    }
}
