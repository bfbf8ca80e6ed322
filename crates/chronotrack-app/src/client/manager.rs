//! Client (customer) CRUD manager

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use chronotrack_core::models::Client;
use chronotrack_store::{Query, StoreClient};

use crate::activity::ActivityLogger;
use crate::error::{AppError, Result};
use crate::session::SessionManager;

const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub name: String,
    pub email: Option<String>,
    pub color: String,
}

pub struct ClientManager {
    store: Arc<StoreClient>,
    activity: Arc<ActivityLogger>,
    session: Arc<SessionManager>,
}

impl ClientManager {
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

    /// All of the user's clients, newest first
    pub async fn list(&self) -> Result<Vec<Client>> {
        let user = self.session.require_user().await?;
        let query = Query::new()
            .eq("user_id", user.id)
            .order("created_at", true);
        Ok(self.store.select("clients", &query).await?)
    }

    pub async fn create(&self, new: NewClient) -> Result<Client> {
        let user = self.session.require_user().await?;
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidData("Client name is required".to_string()));
        }

        let body = json!({
            "user_id": user.id,
            "name": new.name,
            "email": new.email,
            "color": new.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        });
        let client: Client = self.store.insert("clients", &body).await?;

        self.activity
            .log(
                user.id,
                "created_client",
                Some("client"),
                Some(client.id),
                json!({"name": client.name}),
            )
            .await;
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, update: ClientUpdate) -> Result<Client> {
        let user = self.session.require_user().await?;
        let patch = json!({
            "name": update.name,
            "email": update.email,
            "color": update.color,
        });
        let client: Client = self.store.update("clients", id, &patch).await?;

        self.activity
            .log(
                user.id,
                "updated_client",
                Some("client"),
                Some(client.id),
                json!({"name": client.name}),
            )
            .await;
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let user = self.session.require_user().await?;
        self.store.delete("clients", id).await?;

        self.activity
            .log(user.id, "deleted_client", Some("client"), Some(id), json!({}))
            .await;
        Ok(())
    }
}
