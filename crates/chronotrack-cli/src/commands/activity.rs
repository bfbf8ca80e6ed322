//! Activity feed subcommand

use anyhow::{anyhow, Result};
use clap::Args;

use chronotrack_app::ActivityFilter;

use crate::app::App;

#[derive(Debug, Args)]
pub struct ActivityArgs {
    /// all, boards, tasks, projects, clients, time or settings
    #[arg(long, default_value = "all")]
    pub filter: String,
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

pub async fn run(app: &App, args: ActivityArgs) -> Result<()> {
    app.require_session().await?;
    let filter = ActivityFilter::parse(&args.filter)
        .ok_or_else(|| anyhow!("Unknown filter '{}'", args.filter))?;

    let rows = app.feed().list(filter, args.limit).await?;
    if rows.is_empty() {
        println!("No activity.");
        return Ok(());
    }
    for log in rows {
        println!(
            "{}  {:<48} {}",
            log.created_at.format("%Y-%m-%d %H:%M"),
            log.action,
            log.entity_type.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
