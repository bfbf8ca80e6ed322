//! Activity audit sink
//!
//! Wraps the backend's `log_activity` RPC. The sink is append-only and
//! best-effort: a failed write must never fail or block the operation that
//! triggered it, so errors are logged and swallowed here.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use chronotrack_store::StoreClient;

pub struct ActivityLogger {
    store: Arc<StoreClient>,
}

impl ActivityLogger {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    /// Record one activity row; failures are swallowed
    pub async fn log(
        &self,
        user_id: Uuid,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        details: Value,
    ) {
        let args = json!({
            "p_user_id": user_id,
            "p_action": action,
            "p_entity_type": entity_type,
            "p_entity_id": entity_id,
            "p_details": details,
        });

        if let Err(e) = self.store.rpc("log_activity", &args).await {
            tracing::warn!("Error logging activity {}: {}", action, e);
        }
    }
}
