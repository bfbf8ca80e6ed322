//! Time entry data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A single tracked block of work against a project.
///
/// At most one entry per user may have `is_running = true` at any time; the
/// backend enforces this and the timer controller never issues writes that
/// would violate it from the client side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds, authoritative once `end_time` is set
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub is_running: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Seconds elapsed since `start_time` at the given instant, floored and
    /// clamped at zero
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.start_time)
            .num_seconds()
            .max(0) as u64
    }

    /// Whole-second duration between `start_time` and a stop instant
    pub fn duration_until(&self, end_time: DateTime<Utc>) -> i64 {
        end_time
            .signed_duration_since(self.start_time)
            .num_seconds()
            .max(0)
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_running
    }

    /// Validate a manually edited entry before sending it to the store
    pub fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        if end <= start {
            return Err(Error::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        Ok(end.signed_duration_since(start).num_seconds())
    }

    /// Duration as HH:MM:SS
    pub fn duration_formatted(&self) -> String {
        format_seconds(self.duration.max(0) as u64)
    }

    /// Duration in hours, rounded to 2 decimal places
    pub fn duration_hours(&self) -> f64 {
        (self.duration.max(0) as f64 / 3600.0 * 100.0).round() / 100.0
    }
}

/// Format a second count as HH:MM:SS
pub fn format_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
