//! Session lifecycle
//!
//! One `SessionManager` per process, constructed once and shared. Signing in
//! binds the timer controller and reconstructs its state with a single
//! explicit `refresh()`; views never re-derive session state themselves.

use std::sync::Arc;

use tokio::sync::RwLock;

use chronotrack_core::models::Profile;
use chronotrack_store::{Credentials, Query, Session, StoreClient};

use crate::error::{AppError, Result};
use crate::timer::TimerController;

pub struct SessionManager {
    store: Arc<StoreClient>,
    timer: Arc<TimerController>,
    current: RwLock<Option<Profile>>,
}

impl SessionManager {
    pub fn new(store: Arc<StoreClient>, timer: Arc<TimerController>) -> Self {
        Self {
            store,
            timer,
            current: RwLock::new(None),
        }
    }

    /// Sign in with email/password, load the profile row and bring the timer
    /// controller up for this user
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = self.store.sign_in(&credentials).await?;
        self.adopt_session(&session).await
    }

    /// Restore a previously persisted session (CLI token cache)
    pub async fn restore(&self, session: &Session) -> Result<Profile> {
        self.store.set_session(session).await;
        self.adopt_session(session).await
    }

    async fn adopt_session(&self, session: &Session) -> Result<Profile> {
        let query = Query::new().eq("id", session.user.id);
        let profile: Profile = self
            .store
            .select_one("profiles", &query)
            .await?
            .ok_or_else(|| {
                AppError::InvalidData(format!("No profile row for user {}", session.user.id))
            })?;

        {
            let mut current = self.current.write().await;
            *current = Some(profile.clone());
        }

        self.timer.bind(profile.id).await;
        // Reconstruct timer state; a failure here must not fail the sign-in
        if let Err(e) = self.timer.refresh().await {
            tracing::warn!("Could not reconstruct timer state on sign-in: {}", e);
        }

        tracing::info!("Signed in as {}", profile.email);
        Ok(profile)
    }

    /// Sign out: tear the timer down first so its tick cannot outlive the
    /// session, then revoke the token
    pub async fn sign_out(&self) -> Result<()> {
        self.timer.reset().await;
        {
            let mut current = self.current.write().await;
            *current = None;
        }
        self.store.sign_out().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub async fn current(&self) -> Option<Profile> {
        self.current.read().await.clone()
    }

    /// The signed-in profile, or `NotSignedIn`
    pub async fn require_user(&self) -> Result<Profile> {
        self.current().await.ok_or(AppError::NotSignedIn)
    }

    /// The signed-in profile if it has the admin role, or `NotAdmin`
    pub async fn require_admin(&self) -> Result<Profile> {
        let profile = self.require_user().await?;
        if !profile.is_admin() {
            return Err(AppError::NotAdmin);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityLogger;
    use serde_json::json;
    use uuid::Uuid;

    fn profile_json(id: Uuid, email: &str, role: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": email,
            "full_name": "Test User",
            "avatar_url": null,
            "role": role,
            "timezone": "UTC",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        })
    }

    fn session_json(user_id: Uuid, email: &str) -> serde_json::Value {
        json!({
            "access_token": "jwt-token",
            "refresh_token": "refresh",
            "user": {"id": user_id, "email": email},
        })
    }

    fn manager(server: &mockito::ServerGuard) -> SessionManager {
        let store = Arc::new(StoreClient::new(server.url(), "anon-key"));
        let activity = Arc::new(ActivityLogger::new(store.clone()));
        let timer = Arc::new(TimerController::new(store.clone(), activity));
        SessionManager::new(store, timer)
    }

    #[tokio::test]
    async fn test_sign_in_loads_profile_and_refreshes_timer() {
        let mut server = mockito::Server::new_async().await;
        let user_id = Uuid::new_v4();

        let _m = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(session_json(user_id, "user@example.com").to_string())
            .create_async()
            .await;
        let _m = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!([profile_json(user_id, "user@example.com", "member")]).to_string())
            .create_async()
            .await;
        // No running entry to adopt
        let refresh = server
            .mock("GET", "/rest/v1/time_entries")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let manager = manager(&server);
        let profile = manager.sign_in("user@example.com", "hunter2").await.unwrap();

        assert_eq!(profile.email, "user@example.com");
        assert!(manager.current().await.is_some());
        assert!(manager.require_user().await.is_ok());
        assert!(matches!(
            manager.require_admin().await,
            Err(AppError::NotAdmin)
        ));
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_sign_in_missing_profile_is_error() {
        let mut server = mockito::Server::new_async().await;
        let user_id = Uuid::new_v4();

        let _m = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(session_json(user_id, "user@example.com").to_string())
            .create_async()
            .await;
        let _m = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let manager = manager(&server);
        let result = manager.sign_in("user@example.com", "hunter2").await;

        assert!(matches!(result, Err(AppError::InvalidData(_))));
        assert!(manager.current().await.is_none());
    }

    #[tokio::test]
    async fn test_require_user_when_signed_out() {
        let server = mockito::Server::new_async().await;
        let manager = manager(&server);
        assert!(matches!(
            manager.require_user().await,
            Err(AppError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_admin_role_case_insensitive_gate() {
        let mut server = mockito::Server::new_async().await;
        let user_id = Uuid::new_v4();

        let _m = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(session_json(user_id, "admin@example.com").to_string())
            .create_async()
            .await;
        let _m = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!([profile_json(user_id, "admin@example.com", "admin")]).to_string())
            .create_async()
            .await;
        let _m = server
            .mock("GET", "/rest/v1/time_entries")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let manager = manager(&server);
        manager.sign_in("admin@example.com", "hunter2").await.unwrap();

        assert!(manager.require_admin().await.is_ok());
    }
}
