//! Task board subcommands

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use chronotrack_app::{NewBoard, NewTask};
use chronotrack_core::models::TaskStatus;

use super::util::{parse_datetime, parse_status};
use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum BoardsCommand {
    /// List your boards
    List,
    /// Create a board
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a board
    Rm { id: Uuid },
    /// Show a board's tasks by column
    Tasks { board: Uuid },
    /// Add a task to a board
    AddTask {
        board: Uuid,
        title: String,
        /// to_do, in_progress or done
        #[arg(long, default_value = "to_do")]
        status: String,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assign: Option<Uuid>,
    },
    /// Move a task to another column
    Move {
        task: Uuid,
        /// to_do, in_progress or done
        status: String,
    },
    /// Delete a task
    RmTask { id: Uuid },
}

pub async fn run(app: &App, command: BoardsCommand) -> Result<()> {
    app.require_session().await?;
    let boards = app.boards();

    match command {
        BoardsCommand::List => {
            let rows = boards.boards().await?;
            if rows.is_empty() {
                println!("No boards yet.");
                return Ok(());
            }
            for board in rows {
                println!(
                    "{}  {:<24} {}",
                    board.id,
                    board.name,
                    board.description.as_deref().unwrap_or("")
                );
            }
        }
        BoardsCommand::Add {
            name,
            description,
            color,
        } => {
            let board = boards
                .create_board(NewBoard {
                    name,
                    description,
                    color,
                })
                .await?;
            println!("Created board {} ({})", board.name, board.id);
        }
        BoardsCommand::Rm { id } => {
            boards.delete_board(id).await?;
            println!("Deleted board {}", id);
        }
        BoardsCommand::Tasks { board } => {
            let tasks = boards.tasks(board).await?;
            for status in TaskStatus::ALL {
                println!("{}:", status.label());
                for task in tasks.iter().filter(|t| t.status == status) {
                    let due = task
                        .due_date
                        .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
                        .unwrap_or_default();
                    println!("  {}  {}{}", task.id, task.title, due);
                }
            }
        }
        BoardsCommand::AddTask {
            board,
            title,
            status,
            due,
            assign,
        } => {
            let due_date = due.as_deref().map(parse_datetime).transpose()?;
            let task = boards
                .create_task(
                    board,
                    NewTask {
                        title,
                        description: None,
                        status: parse_status(&status)?,
                        due_date,
                        assigned_to: assign,
                    },
                )
                .await?;
            println!("Created task {} ({})", task.title, task.id);
        }
        BoardsCommand::Move { task, status } => {
            let task = boards.move_task(task, parse_status(&status)?).await?;
            println!("Moved {} to {}", task.title, task.status.label());
        }
        BoardsCommand::RmTask { id } => {
            boards.delete_task(id).await?;
            println!("Deleted task {}", id);
        }
    }
    Ok(())
}
