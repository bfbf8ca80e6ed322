//! Own-profile settings

use std::sync::Arc;

use serde_json::json;

use chronotrack_core::models::Profile;
use chronotrack_store::StoreClient;

use crate::activity::ActivityLogger;
use crate::error::{AppError, Result};
use crate::session::SessionManager;

pub struct ProfileManager {
    store: Arc<StoreClient>,
    activity: Arc<ActivityLogger>,
    session: Arc<SessionManager>,
}

impl ProfileManager {
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

    /// Update display name and timezone. Email is owned by the auth service
    /// and cannot be changed here.
    pub async fn update(
        &self,
        full_name: Option<String>,
        timezone: String,
    ) -> Result<Profile> {
        let user = self.session.require_user().await?;
        let patch = json!({
            "full_name": full_name,
            "timezone": timezone,
        });
        let profile: Profile = self.store.update("profiles", user.id, &patch).await?;

        self.activity
            .log(user.id, "updated_profile", None, None, json!({}))
            .await;
        Ok(profile)
    }

    pub async fn change_password(&self, new_password: &str) -> Result<()> {
        let user = self.session.require_user().await?;
        if new_password.len() < 8 {
            return Err(AppError::InvalidData(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        self.store
            .update_user(&json!({"password": new_password}))
            .await?;

        self.activity
            .log(user.id, "changed_password", None, None, json!({}))
            .await;
        Ok(())
    }
}
