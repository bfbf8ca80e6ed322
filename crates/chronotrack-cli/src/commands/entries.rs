//! Manual time-entry subcommands

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use chronotrack_app::NewManualEntry;

use super::util::{parse_datetime, parse_range, resolve_project};
use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    /// List entries in a window
    List {
        #[arg(long, default_value = "week")]
        range: String,
        /// Restrict to one project (id or name)
        #[arg(long)]
        project: Option<String>,
    },
    /// Record a completed block of work
    Add {
        /// Project id or name
        #[arg(long)]
        project: String,
        /// Start, RFC 3339 or `YYYY-MM-DD HH:MM` (UTC)
        #[arg(long)]
        start: String,
        /// End, same formats
        #[arg(long)]
        end: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an entry
    Rm { id: Uuid },
}

pub async fn run(app: &App, command: EntriesCommand) -> Result<()> {
    app.require_session().await?;
    let entries = app.entries();

    match command {
        EntriesCommand::List { range, project } => {
            let range = parse_range(&range)?;
            let project_id = match project {
                Some(reference) => Some(resolve_project(&app.projects(), &reference).await?),
                None => None,
            };
            let rows = entries.list(Some(&range), project_id).await?;
            if rows.is_empty() {
                println!("No entries in this window.");
                return Ok(());
            }
            for entry in rows {
                let marker = if entry.is_running { " (running)" } else { "" };
                println!(
                    "{}  {}  {:>9}  {}{}",
                    entry.id,
                    entry.start_time.format("%Y-%m-%d %H:%M"),
                    entry.duration_formatted(),
                    entry.description.as_deref().unwrap_or(""),
                    marker
                );
            }
        }
        EntriesCommand::Add {
            project,
            start,
            end,
            description,
        } => {
            let project_id = resolve_project(&app.projects(), &project).await?;
            let entry = entries
                .create_manual(NewManualEntry {
                    project_id,
                    description,
                    start_time: parse_datetime(&start)?,
                    end_time: parse_datetime(&end)?,
                })
                .await?;
            println!("Recorded {} ({})", entry.duration_formatted(), entry.id);
        }
        EntriesCommand::Rm { id } => {
            entries.delete(id).await?;
            println!("Deleted entry {}", id);
        }
    }
    Ok(())
}
