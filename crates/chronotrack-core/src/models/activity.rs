//! Activity and admin audit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One row of the per-user activity feed, written through the backend's
/// `log_activity` RPC
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    #[serde(default)]
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

/// One row of the admin-side audit trail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminAction {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub target_user_id: Option<Uuid>,
    #[serde(default)]
    pub details: Value,
    pub created_at: DateTime<Utc>,
}
