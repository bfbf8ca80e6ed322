//! Kanban boards and tasks

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use chronotrack_core::models::{Board, Task, TaskStatus};
use chronotrack_store::{Error as StoreError, Query, StoreClient};

use crate::activity::ActivityLogger;
use crate::error::{AppError, Result};
use crate::session::SessionManager;

const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone)]
pub struct NewBoard {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
}

pub struct BoardManager {
    store: Arc<StoreClient>,
    activity: Arc<ActivityLogger>,
    session: Arc<SessionManager>,
}

impl BoardManager {
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

    /// The user's boards, newest first
    pub async fn boards(&self) -> Result<Vec<Board>> {
        let user = self.session.require_user().await?;
        let query = Query::new()
            .eq("user_id", user.id)
            .order("created_at", true);
        Ok(self.store.select("boards", &query).await?)
    }

    pub async fn create_board(&self, new: NewBoard) -> Result<Board> {
        let user = self.session.require_user().await?;
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidData("Board name is required".to_string()));
        }

        let body = json!({
            "user_id": user.id,
            "name": new.name,
            "description": new.description,
            "color": new.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        });
        let board: Board = self.store.insert("boards", &body).await?;

        self.activity
            .log(
                user.id,
                "created_board",
                Some("board"),
                Some(board.id),
                json!({"name": board.name}),
            )
            .await;
        Ok(board)
    }

    pub async fn update_board(&self, id: Uuid, update: BoardUpdate) -> Result<Board> {
        let user = self.session.require_user().await?;
        let patch = json!({
            "name": update.name,
            "description": update.description,
            "color": update.color,
        });
        let board: Board = self.store.update("boards", id, &patch).await?;

        self.activity
            .log(
                user.id,
                "updated_board",
                Some("board"),
                Some(board.id),
                json!({"name": board.name}),
            )
            .await;
        Ok(board)
    }

    pub async fn delete_board(&self, id: Uuid) -> Result<()> {
        let user = self.session.require_user().await?;
        self.store.delete("boards", id).await?;

        self.activity
            .log(user.id, "deleted_board", Some("board"), Some(id), json!({}))
            .await;
        Ok(())
    }

    /// A board's tasks, column order first, newest within a position
    pub async fn tasks(&self, board_id: Uuid) -> Result<Vec<Task>> {
        self.session.require_user().await?;
        let query = Query::new()
            .eq("board_id", board_id)
            .order("position", false)
            .order("created_at", true);
        Ok(self.store.select("tasks", &query).await?)
    }

    /// New tasks land at the end of the board
    pub async fn create_task(&self, board_id: Uuid, new: NewTask) -> Result<Task> {
        let user = self.session.require_user().await?;
        if new.title.trim().is_empty() {
            return Err(AppError::InvalidData("Task title is required".to_string()));
        }
        let position = self.tasks(board_id).await?.len() as i32;

        let body = json!({
            "board_id": board_id,
            "title": new.title,
            "description": new.description,
            "status": new.status,
            "due_date": new.due_date,
            "assigned_to": new.assigned_to,
            "position": position,
        });
        let task: Task = self.store.insert("tasks", &body).await?;

        self.activity
            .log(
                user.id,
                "created_task",
                Some("task"),
                Some(task.id),
                json!({"title": task.title}),
            )
            .await;
        Ok(task)
    }

    /// Full-form task edit. A status change is audited with the transition
    /// in the action name, matching the board history feed.
    pub async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<Task> {
        let user = self.session.require_user().await?;
        let old_status = self.task(id).await?.status;

        let patch = json!({
            "title": update.title,
            "description": update.description,
            "status": update.status,
            "due_date": update.due_date,
            "assigned_to": update.assigned_to,
        });
        let task: Task = self.store.update("tasks", id, &patch).await?;

        let action = if old_status != task.status {
            status_change_action(old_status, task.status)
        } else {
            "updated_task".to_string()
        };
        self.activity
            .log(
                user.id,
                &action,
                Some("task"),
                Some(task.id),
                json!({"title": task.title}),
            )
            .await;
        Ok(task)
    }

    /// Drag a task to another column
    pub async fn move_task(&self, id: Uuid, status: TaskStatus) -> Result<Task> {
        let user = self.session.require_user().await?;
        let old_status = self.task(id).await?.status;
        if old_status == status {
            return self.task(id).await;
        }

        let task: Task = self
            .store
            .update("tasks", id, &json!({"status": status}))
            .await?;

        self.activity
            .log(
                user.id,
                &status_change_action(old_status, task.status),
                Some("task"),
                Some(task.id),
                json!({"title": task.title}),
            )
            .await;
        Ok(task)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        let user = self.session.require_user().await?;
        self.store.delete("tasks", id).await?;

        self.activity
            .log(user.id, "deleted_task", Some("task"), Some(id), json!({}))
            .await;
        Ok(())
    }

    async fn task(&self, id: Uuid) -> Result<Task> {
        let query = Query::new().eq("id", id);
        self.store
            .select_one("tasks", &query)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("task {}", id)).into())
    }
}

fn status_change_action(from: TaskStatus, to: TaskStatus) -> String {
    format!(
        "updated_task_status_from_{}_to_{}",
        from.as_str(),
        to.as_str()
    )
}
