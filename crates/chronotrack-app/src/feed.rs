//! Per-user activity feed

use std::sync::Arc;

use chronotrack_core::models::ActivityLog;
use chronotrack_store::{Query, StoreClient};

use crate::error::Result;
use crate::session::SessionManager;

/// Filter classes the feed can be narrowed to. `Time` and `Settings` select
/// by action name because their rows span entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Boards,
    Tasks,
    Projects,
    Clients,
    Time,
    Settings,
}

const TIME_ACTIONS: &[&str] = &[
    "started_timer",
    "stopped_timer",
    "created_time_entry",
    "updated_time_entry",
    "deleted_time_entry",
];

const SETTINGS_ACTIONS: &[&str] = &["updated_profile", "changed_password"];

pub struct ActivityFeed {
    store: Arc<StoreClient>,
    session: Arc<SessionManager>,
}

impl ActivityFeed {
    pub fn new(store: Arc<StoreClient>, session: Arc<SessionManager>) -> Self {
        Self { store, session }
    }

    /// The signed-in user's activity, newest first
    pub async fn list(&self, filter: ActivityFilter, limit: usize) -> Result<Vec<ActivityLog>> {
        let user = self.session.require_user().await?;
        let query = apply_filter(
            Query::new()
                .eq("user_id", user.id)
                .order("created_at", true)
                .limit(limit),
            filter,
        );
        Ok(self.store.select("activity_logs", &query).await?)
    }
}

fn apply_filter(query: Query, filter: ActivityFilter) -> Query {
    match filter {
        ActivityFilter::All => query,
        ActivityFilter::Boards => query.eq("entity_type", "board"),
        ActivityFilter::Tasks => query.eq("entity_type", "task"),
        ActivityFilter::Projects => query.eq("entity_type", "project"),
        ActivityFilter::Clients => query.eq("entity_type", "client"),
        ActivityFilter::Time => query.in_list("action", TIME_ACTIONS),
        ActivityFilter::Settings => query.in_list("action", SETTINGS_ACTIONS),
    }
}

impl ActivityFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "boards" => Some(Self::Boards),
            "tasks" => Some(Self::Tasks),
            "projects" => Some(Self::Projects),
            "clients" => Some(Self::Clients),
            "time" => Some(Self::Time),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}
