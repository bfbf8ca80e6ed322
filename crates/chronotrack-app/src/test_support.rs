//! Shared fixtures for manager tests

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use chronotrack_store::StoreClient;

use crate::activity::ActivityLogger;
use crate::session::SessionManager;
use crate::timer::TimerController;

pub struct TestHarness {
    pub store: Arc<StoreClient>,
    pub activity: Arc<ActivityLogger>,
    pub session: Arc<SessionManager>,
    pub user_id: Uuid,
}

/// Mock the sign-in round trip (token, profile row, timer refresh) and
/// return a signed-in session plus the ids the mocks used
pub async fn signed_in(server: &mut mockito::ServerGuard, role: &str) -> TestHarness {
    let user_id = Uuid::new_v4();

    let _token = server
        .mock("POST", "/auth/v1/token")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "access_token": "jwt-token",
                "refresh_token": "refresh",
                "user": {"id": user_id, "email": "user@example.com"},
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _profile = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            json!([{
                "id": user_id,
                "email": "user@example.com",
                "full_name": "Test User",
                "avatar_url": null,
                "role": role,
                "timezone": "UTC",
                "created_at": "2025-01-01T00:00:00Z",
                "updated_at": "2025-01-01T00:00:00Z",
            }])
            .to_string(),
        )
        .create_async()
        .await;
    let _refresh = server
        .mock("GET", "/rest/v1/time_entries")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let store = Arc::new(StoreClient::new(server.url(), "anon-key"));
    let activity = Arc::new(ActivityLogger::new(store.clone()));
    let timer = Arc::new(TimerController::new(store.clone(), activity.clone()));
    let session = Arc::new(SessionManager::new(store.clone(), timer));
    session
        .sign_in("user@example.com", "hunter2")
        .await
        .expect("test sign-in failed");

    TestHarness {
        store,
        activity,
        session,
        user_id,
    }
}
