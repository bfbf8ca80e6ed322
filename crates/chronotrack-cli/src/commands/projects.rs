//! Project subcommands

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use chronotrack_app::NewProject;

use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects (active only by default)
    List {
        /// Include deactivated projects
        #[arg(long)]
        all: bool,
    },
    /// Add a project
    Add {
        name: String,
        #[arg(long)]
        client_id: Option<Uuid>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Hourly rate for earnings reports
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Deactivate a project without deleting its entries
    Deactivate { id: Uuid },
    /// Reactivate a project
    Activate { id: Uuid },
    /// Delete a project
    Rm { id: Uuid },
}

pub async fn run(app: &App, command: ProjectsCommand) -> Result<()> {
    app.require_session().await?;
    let projects = app.projects();

    match command {
        ProjectsCommand::List { all } => {
            let rows = projects.list(!all).await?;
            if rows.is_empty() {
                println!("No projects yet.");
                return Ok(());
            }
            for project in rows {
                let status = if project.is_active { "" } else { " (inactive)" };
                let rate = project
                    .hourly_rate
                    .map(|r| format!("{:.2}/h", r))
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {:<24} {}{}", project.id, project.name, rate, status);
            }
        }
        ProjectsCommand::Add {
            name,
            client_id,
            description,
            color,
            rate,
        } => {
            let project = projects
                .create(NewProject {
                    name,
                    client_id,
                    description,
                    color,
                    hourly_rate: rate,
                })
                .await?;
            println!("Created project {} ({})", project.name, project.id);
        }
        ProjectsCommand::Deactivate { id } => {
            let project = projects.set_active(id, false).await?;
            println!("Deactivated {}", project.name);
        }
        ProjectsCommand::Activate { id } => {
            let project = projects.set_active(id, true).await?;
            println!("Activated {}", project.name);
        }
        ProjectsCommand::Rm { id } => {
            projects.delete(id).await?;
            println!("Deleted project {}", id);
        }
    }
    Ok(())
}
