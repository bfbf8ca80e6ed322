//! Project data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub hourly_rate: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Earnings for a number of tracked seconds at this project's rate
    pub fn earnings_for(&self, seconds: i64) -> f64 {
        let rate = self.hourly_rate.unwrap_or(0.0);
        seconds.max(0) as f64 / 3600.0 * rate
    }
}
