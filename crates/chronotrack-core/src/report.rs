//! Report aggregation over time entries
//!
//! Pure functions; fetching is the app layer's job.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Project, TimeEntry};

/// Inclusive report window in UTC
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn today() -> Self {
        let start = Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Current week, Monday through Sunday
    pub fn this_week() -> Self {
        let today = Utc::now().date_naive();
        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let start = monday.and_hms_opt(0, 0, 0).unwrap().and_utc();
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    pub fn this_month() -> Self {
        let today = Utc::now().date_naive();
        let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        let next = if today.month() == 12 {
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1).unwrap()
        };
        Self {
            start: first.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            end: next.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        }
    }

    pub fn last_days(days: i64) -> Self {
        let end = Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc()
            + Duration::days(1);
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// Number of calendar days the range spans, at least 1
    pub fn days(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days().max(1)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_seconds: i64,
    pub total_earnings: f64,
    pub avg_daily_seconds: i64,
    pub top_project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTotal {
    pub project_id: Uuid,
    pub name: String,
    pub seconds: i64,
    pub earnings: f64,
}

/// Summary statistics over a set of entries
pub fn summarize(
    entries: &[TimeEntry],
    projects: &HashMap<Uuid, Project>,
    range: &DateRange,
) -> ReportSummary {
    let total_seconds: i64 = entries.iter().map(|e| e.duration.max(0)).sum();
    let total_earnings: f64 = entries
        .iter()
        .map(|e| {
            projects
                .get(&e.project_id)
                .map(|p| p.earnings_for(e.duration))
                .unwrap_or(0.0)
        })
        .sum();

    let top_project = project_totals(entries, projects)
        .into_iter()
        .next()
        .map(|t| t.name);

    ReportSummary {
        total_seconds,
        total_earnings,
        avg_daily_seconds: total_seconds / range.days(),
        top_project,
    }
}

/// Tracked seconds per calendar day, ascending; days without entries are
/// omitted
pub fn daily_totals(entries: &[TimeEntry]) -> Vec<DailyTotal> {
    let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for entry in entries {
        *by_day.entry(entry.start_time.date_naive()).or_insert(0) += entry.duration.max(0);
    }

    let mut totals: Vec<DailyTotal> = by_day
        .into_iter()
        .map(|(date, seconds)| DailyTotal { date, seconds })
        .collect();
    totals.sort_by_key(|t| t.date);
    totals
}

/// Tracked seconds per project, descending by time
pub fn project_totals(
    entries: &[TimeEntry],
    projects: &HashMap<Uuid, Project>,
) -> Vec<ProjectTotal> {
    let mut by_project: HashMap<Uuid, i64> = HashMap::new();
    for entry in entries {
        *by_project.entry(entry.project_id).or_insert(0) += entry.duration.max(0);
    }

    let mut totals: Vec<ProjectTotal> = by_project
        .into_iter()
        .map(|(project_id, seconds)| {
            let (name, earnings) = match projects.get(&project_id) {
                Some(p) => (p.name.clone(), p.earnings_for(seconds)),
                None => ("Unknown".to_string(), 0.0),
            };
            ProjectTotal {
                project_id,
                name,
                seconds,
                earnings,
            }
        })
        .collect();
    totals.sort_by(|a, b| b.seconds.cmp(&a.seconds));
    totals
}
