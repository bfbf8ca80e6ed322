//! Manual time-entry CRUD
//!
//! Editing entries after the fact is a separate path from the timer state
//! machine; these operations never touch the running entry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use chronotrack_core::models::TimeEntry;
use chronotrack_core::report::DateRange;
use chronotrack_store::{Query, StoreClient};

use crate::activity::ActivityLogger;
use crate::error::Result;
use crate::session::SessionManager;

#[derive(Debug, Clone)]
pub struct NewManualEntry {
    pub project_id: Uuid,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EntryUpdate {
    pub project_id: Uuid,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub struct EntryManager {
    store: Arc<StoreClient>,
    activity: Arc<ActivityLogger>,
    session: Arc<SessionManager>,
}

impl EntryManager {
    pub fn new(
        store: Arc<StoreClient>,
        activity: Arc<ActivityLogger>,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            activity,
            session,
        }
    }

    /// Entries in a window, newest first
    pub async fn list(
        &self,
        range: Option<&DateRange>,
        project_id: Option<Uuid>,
    ) -> Result<Vec<TimeEntry>> {
        let user = self.session.require_user().await?;
        let mut query = Query::new()
            .eq("user_id", user.id)
            .order("start_time", true);
        if let Some(range) = range {
            query = query
                .gte("start_time", range.start.to_rfc3339())
                .lte("start_time", range.end.to_rfc3339());
        }
        if let Some(project_id) = project_id {
            query = query.eq("project_id", project_id);
        }
        Ok(self.store.select("time_entries", &query).await?)
    }

    /// Record a completed block of work by hand
    pub async fn create_manual(&self, new: NewManualEntry) -> Result<TimeEntry> {
        let user = self.session.require_user().await?;
        let duration = TimeEntry::validate_range(new.start_time, new.end_time)?;

        let body = json!({
            "user_id": user.id,
            "project_id": new.project_id,
            "description": new.description.unwrap_or_default(),
            "start_time": new.start_time,
            "end_time": new.end_time,
            "duration": duration,
            "is_running": false,
        });
        let entry: TimeEntry = self.store.insert("time_entries", &body).await?;

        self.activity
            .log(
                user.id,
                "created_time_entry",
                Some("time_entry"),
                Some(entry.id),
                json!({"duration": duration}),
            )
            .await;
        Ok(entry)
    }

    /// Rewrite an entry; the duration is recomputed from the new window
    pub async fn update(&self, id: Uuid, update: EntryUpdate) -> Result<TimeEntry> {
        let user = self.session.require_user().await?;
        let duration = TimeEntry::validate_range(update.start_time, update.end_time)?;

        let patch = json!({
            "project_id": update.project_id,
            "description": update.description.unwrap_or_default(),
            "start_time": update.start_time,
            "end_time": update.end_time,
            "duration": duration,
        });
        let entry: TimeEntry = self.store.update("time_entries", id, &patch).await?;

        self.activity
            .log(
                user.id,
                "updated_time_entry",
                Some("time_entry"),
                Some(entry.id),
                json!({"duration": duration}),
            )
            .await;
        Ok(entry)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let user = self.session.require_user().await?;
        self.store.delete("time_entries", id).await?;

        self.activity
            .log(
                user.id,
                "deleted_time_entry",
                Some("time_entry"),
                Some(id),
                json!({}),
            )
            .await;
        Ok(())
    }
}
