//! Client subcommands

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use chronotrack_app::NewClient;

use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List your clients
    List,
    /// Add a client
    Add {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a client
    Rm { id: Uuid },
}

pub async fn run(app: &App, command: ClientsCommand) -> Result<()> {
    app.require_session().await?;
    let clients = app.clients();

    match command {
        ClientsCommand::List => {
            let rows = clients.list().await?;
            if rows.is_empty() {
                println!("No clients yet.");
                return Ok(());
            }
            for client in rows {
                println!(
                    "{}  {:<24} {}",
                    client.id,
                    client.name,
                    client.email.as_deref().unwrap_or("-")
                );
            }
        }
        ClientsCommand::Add { name, email, color } => {
            let client = clients.create(NewClient { name, email, color }).await?;
            println!("Created client {} ({})", client.name, client.id);
        }
        ClientsCommand::Rm { id } => {
            clients.delete(id).await?;
            println!("Deleted client {}", id);
        }
    }
    Ok(())
}
