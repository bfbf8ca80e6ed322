//! Project CRUD manager

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use chronotrack_core::models::Project;
use chronotrack_store::{Query, StoreClient};

use crate::activity::ActivityLogger;
use crate::error::{AppError, Result};
use crate::session::SessionManager;

const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub client_id: Option<Uuid>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ProjectUpdate {
    pub name: String,
    pub client_id: Option<Uuid>,
    pub description: Option<String>,
    pub color: String,
    pub hourly_rate: Option<f64>,
}

pub struct ProjectManager {
    store: Arc<StoreClient>,
    activity: Arc<ActivityLogger>,
    session: Arc<SessionManager>,
}

impl ProjectManager {
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

    /// The user's projects, newest first
    pub async fn list(&self, active_only: bool) -> Result<Vec<Project>> {
        let user = self.session.require_user().await?;
        let mut query = Query::new()
            .eq("user_id", user.id)
            .order("created_at", true);
        if active_only {
            query = query.eq("is_active", true);
        }
        Ok(self.store.select("projects", &query).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        self.session.require_user().await?;
        let query = Query::new().eq("id", id);
        Ok(self.store.select_one("projects", &query).await?)
    }

    pub async fn create(&self, new: NewProject) -> Result<Project> {
        let user = self.session.require_user().await?;
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidData("Project name is required".to_string()));
        }

        let body = json!({
            "user_id": user.id,
            "client_id": new.client_id,
            "name": new.name,
            "description": new.description,
            "color": new.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            "hourly_rate": new.hourly_rate,
            "is_active": true,
        });
        let project: Project = self.store.insert("projects", &body).await?;

        self.activity
            .log(
                user.id,
                "created_project",
                Some("project"),
                Some(project.id),
                json!({"name": project.name}),
            )
            .await;
        Ok(project)
    }

    pub async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        let user = self.session.require_user().await?;
        let patch = json!({
            "client_id": update.client_id,
            "name": update.name,
            "description": update.description,
            "color": update.color,
            "hourly_rate": update.hourly_rate,
        });
        let project: Project = self.store.update("projects", id, &patch).await?;

        self.activity
            .log(
                user.id,
                "updated_project",
                Some("project"),
                Some(project.id),
                json!({"name": project.name}),
            )
            .await;
        Ok(project)
    }

    /// Activate or deactivate without touching other fields
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Project> {
        let user = self.session.require_user().await?;
        let project: Project = self
            .store
            .update("projects", id, &json!({"is_active": active}))
            .await?;

        let action = if active {
            "activated_project"
        } else {
            "deactivated_project"
        };
        self.activity
            .log(
                user.id,
                action,
                Some("project"),
                Some(project.id),
                json!({"name": project.name}),
            )
            .await;
        Ok(project)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let user = self.session.require_user().await?;
        self.store.delete("projects", id).await?;

        self.activity
            .log(
                user.id,
                "deleted_project",
                Some("project"),
                Some(id),
                json!({}),
            )
            .await;
        Ok(())
    }
}
