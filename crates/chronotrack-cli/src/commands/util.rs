//! Shared argument parsing helpers

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use chronotrack_app::ProjectManager;
use chronotrack_core::models::TaskStatus;
use chronotrack_core::report::DateRange;

/// Accepts RFC 3339 or `YYYY-MM-DD HH:MM` (taken as UTC)
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.to_utc());
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("Unrecognized datetime: {}", s))?;
    Ok(naive.and_utc())
}

pub fn parse_range(s: &str) -> Result<DateRange> {
    match s {
        "today" => Ok(DateRange::today()),
        "week" => Ok(DateRange::this_week()),
        "month" => Ok(DateRange::this_month()),
        "7d" => Ok(DateRange::last_days(7)),
        "30d" => Ok(DateRange::last_days(30)),
        other => Err(anyhow!(
            "Unknown range '{}'; expected today, week, month, 7d or 30d",
            other
        )),
    }
}

pub fn parse_status(s: &str) -> Result<TaskStatus> {
    match s.to_lowercase().as_str() {
        "to_do" | "todo" => Ok(TaskStatus::ToDo),
        "in_progress" | "doing" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err(anyhow!(
            "Unknown status '{}'; expected to_do, in_progress or done",
            other
        )),
    }
}

/// A project referenced by id or by (case-insensitive) name
pub async fn resolve_project(projects: &ProjectManager, reference: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(reference) {
        return Ok(id);
    }
    let all = projects.list(false).await?;
    all.iter()
        .find(|p| p.name.eq_ignore_ascii_case(reference))
        .map(|p| p.id)
        .ok_or_else(|| anyhow!("No project named '{}'", reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2025-06-02T09:30:00Z").is_ok());
        assert!(parse_datetime("2025-06-02 09:30").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_parse_range() {
        assert!(parse_range("week").is_ok());
        assert_eq!(parse_range("7d").unwrap().days(), 7);
        assert!(parse_range("fortnight").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("todo").unwrap(), TaskStatus::ToDo);
        assert_eq!(parse_status("in_progress").unwrap(), TaskStatus::InProgress);
        assert!(parse_status("archived").is_err());
    }
}
