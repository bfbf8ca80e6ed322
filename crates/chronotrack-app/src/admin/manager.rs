//! Admin console operations
//!
//! Everything here is gated locally on the admin role; row-level security
//! on the backend is the real enforcer, the local check just produces a
//! clear error instead of empty result sets.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use chronotrack_core::models::{AdminAction, Profile, Role, TimeEntry};
use chronotrack_core::report::DateRange;
use chronotrack_store::{Query, StoreClient};

use crate::error::{AppError, Result};
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq)]
pub struct UserUsage {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub entry_count: usize,
    pub total_seconds: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminAnalytics {
    pub total_users: usize,
    pub total_entries: usize,
    pub total_seconds: i64,
    pub per_user: Vec<UserUsage>,
}

pub struct AdminManager {
    store: Arc<StoreClient>,
    session: Arc<SessionManager>,
}

impl AdminManager {
    pub fn new(store: Arc<StoreClient>, session: Arc<SessionManager>) -> Self {
        Self { store, session }
    }

    /// Every profile, newest first
    pub async fn list_users(&self) -> Result<Vec<Profile>> {
        self.session.require_admin().await?;
        let query = Query::new().order("created_at", true);
        Ok(self.store.select("profiles", &query).await?)
    }

    /// Every user's entries in a window, newest first
    pub async fn all_entries(&self, range: Option<&DateRange>) -> Result<Vec<TimeEntry>> {
        self.session.require_admin().await?;
        let mut query = Query::new().order("start_time", true);
        if let Some(range) = range {
            query = query
                .gte("start_time", range.start.to_rfc3339())
                .lte("start_time", range.end.to_rfc3339());
        }
        Ok(self.store.select("time_entries", &query).await?)
    }

    /// One user's profile and usage totals
    pub async fn user_overview(&self, user_id: Uuid) -> Result<Option<UserUsage>> {
        self.session.require_admin().await?;

        let profile: Option<Profile> = self
            .store
            .select_one("profiles", &Query::new().eq("id", user_id))
            .await?;
        let Some(profile) = profile else {
            return Ok(None);
        };

        let entries: Vec<TimeEntry> = self
            .store
            .select("time_entries", &Query::new().eq("user_id", user_id))
            .await?;

        Ok(Some(UserUsage {
            user_id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            entry_count: entries.len(),
            total_seconds: entries.iter().map(|e| e.duration.max(0)).sum(),
        }))
    }

    /// Usage rollup across all users
    pub async fn analytics(&self) -> Result<AdminAnalytics> {
        self.session.require_admin().await?;

        let profiles: Vec<Profile> = self.store.select("profiles", &Query::new()).await?;
        let entries: Vec<TimeEntry> = self.store.select("time_entries", &Query::new()).await?;

        let mut by_user: HashMap<Uuid, (usize, i64)> = HashMap::new();
        for entry in &entries {
            let slot = by_user.entry(entry.user_id).or_insert((0, 0));
            slot.0 += 1;
            slot.1 += entry.duration.max(0);
        }

        let total_seconds = entries.iter().map(|e| e.duration.max(0)).sum();
        let mut per_user: Vec<UserUsage> = profiles
            .iter()
            .map(|p| {
                let (entry_count, total_seconds) =
                    by_user.get(&p.id).copied().unwrap_or((0, 0));
                UserUsage {
                    user_id: p.id,
                    email: p.email.clone(),
                    full_name: p.full_name.clone(),
                    entry_count,
                    total_seconds,
                }
            })
            .collect();
        per_user.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds));

        Ok(AdminAnalytics {
            total_users: profiles.len(),
            total_entries: entries.len(),
            total_seconds,
            per_user,
        })
    }

    /// Change a user's role through the backend's privileged RPC
    pub async fn change_role(&self, target_user_id: Uuid, role: Role) -> Result<()> {
        self.session.require_admin().await?;
        let result = self
            .store
            .rpc(
                "change_user_role",
                &json!({
                    "target_user_id": target_user_id,
                    "new_role": role.as_str(),
                }),
            )
            .await?;
        check_rpc_result(result)
    }

    /// Delete a user account and everything it owns
    pub async fn delete_user(&self, target_user_id: Uuid) -> Result<()> {
        self.session.require_admin().await?;
        let result = self
            .store
            .rpc(
                "delete_user_account",
                &json!({"target_user_id": target_user_id}),
            )
            .await?;
        check_rpc_result(result)
    }

    /// The admin audit trail, newest first
    pub async fn admin_actions(&self, limit: usize) -> Result<Vec<AdminAction>> {
        self.session.require_admin().await?;
        let query = Query::new().order("created_at", true).limit(limit);
        Ok(self.store.select("admin_actions", &query).await?)
    }
}

/// The admin RPCs report refusals inside an otherwise successful response
fn check_rpc_result(result: serde_json::Value) -> Result<()> {
    if let Some(message) = result.get("error").and_then(|e| e.as_str()) {
        return Err(AppError::InvalidData(message.to_string()));
    }
    Ok(())
}
