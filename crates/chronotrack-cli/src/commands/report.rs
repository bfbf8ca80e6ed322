//! Report subcommand

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use chronotrack_core::models::entry::format_seconds;

use super::util::{parse_range, resolve_project};
use crate::app::App;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// today, week, month, 7d or 30d
    #[arg(long, default_value = "week")]
    pub range: String,
    /// Restrict to one project (id or name)
    #[arg(long)]
    pub project: Option<String>,
    /// Also write the entries as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub async fn run(app: &App, args: ReportArgs) -> Result<()> {
    app.require_session().await?;
    let range = parse_range(&args.range)?;
    let project_id = match args.project {
        Some(reference) => Some(resolve_project(&app.projects(), &reference).await?),
        None => None,
    };

    let reports = app.reports();
    let report = reports.build(&range, project_id).await?;

    println!("Total tracked   {}", format_seconds(report.summary.total_seconds.max(0) as u64));
    println!("Earnings        {:.2}", report.summary.total_earnings);
    println!(
        "Daily average   {}",
        format_seconds(report.summary.avg_daily_seconds.max(0) as u64)
    );
    if let Some(top) = &report.summary.top_project {
        println!("Top project     {}", top);
    }

    if !report.per_project.is_empty() {
        println!("\nBy project:");
        for total in &report.per_project {
            println!(
                "  {:<24} {:>9}  {:.2}",
                total.name,
                format_seconds(total.seconds.max(0) as u64),
                total.earnings
            );
        }
    }

    if !report.daily.is_empty() {
        println!("\nBy day:");
        for day in &report.daily {
            println!(
                "  {}  {}",
                day.date,
                format_seconds(day.seconds.max(0) as u64)
            );
        }
    }

    if let Some(path) = args.csv {
        let file = File::create(&path)?;
        reports.export_csv(file, &range, project_id).await?;
        println!("\nWrote {}", path.display());
    }
    Ok(())
}
