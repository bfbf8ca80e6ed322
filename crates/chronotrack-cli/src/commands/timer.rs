//! Timer subcommands

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use chronotrack_core::models::entry::format_seconds;

use super::util::resolve_project;
use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum TimerCommand {
    /// Start timing a project (stops any running timer first)
    Start {
        /// Project id or name
        project: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Stop the running timer and record the session
    Stop,
    /// Pause the running timer; resume later with `resume`
    Pause,
    /// Revive a stopped entry with a fresh start time
    Resume { entry_id: Uuid },
    /// Show the running timer, reconstructed from the backend
    Status,
}

pub async fn run(app: &App, command: TimerCommand) -> Result<()> {
    app.require_session().await?;

    match command {
        TimerCommand::Start {
            project,
            description,
        } => {
            let project_id = resolve_project(&app.projects(), &project).await?;
            app.timer.start(Some(project_id), description).await?;
            println!("Timer started.");
        }
        TimerCommand::Stop => {
            let Some(entry) = app.timer.active_entry().await else {
                println!("No timer running.");
                return Ok(());
            };
            app.timer.stop().await?;
            println!(
                "Stopped after {}.",
                format_seconds(entry.elapsed_seconds(chrono::Utc::now()))
            );
        }
        TimerCommand::Pause => {
            let Some(entry) = app.timer.active_entry().await else {
                println!("No timer running.");
                return Ok(());
            };
            app.timer.pause().await?;
            println!(
                "Paused after {}; resume with `chronotrack timer resume {}`.",
                format_seconds(entry.elapsed_seconds(chrono::Utc::now())),
                entry.id
            );
        }
        TimerCommand::Resume { entry_id } => {
            app.timer.resume(entry_id).await?;
            println!("Timer resumed.");
        }
        TimerCommand::Status => {
            // require_session already refreshed from the backend
            match app.timer.active_entry().await {
                Some(entry) => {
                    println!(
                        "Running: {} (started {})",
                        entry.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("(no description)"),
                        entry.start_time.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                    println!("Elapsed: {}", format_seconds(app.timer.elapsed_seconds()));
                }
                None => println!("No timer running."),
            }
        }
    }
    Ok(())
}
