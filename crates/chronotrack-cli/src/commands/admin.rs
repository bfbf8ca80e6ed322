//! Admin console subcommands

use anyhow::Result;
use clap::Subcommand;
use uuid::Uuid;

use chronotrack_core::models::entry::format_seconds;
use chronotrack_core::models::Role;

use super::util::parse_range;
use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List all users
    Users,
    /// One user's profile and usage totals
    User { user: Uuid },
    /// Usage rollup across all users
    Analytics,
    /// Every user's entries in a window
    Entries {
        #[arg(long, default_value = "week")]
        range: String,
    },
    /// Change a user's role (member or admin)
    Role { user: Uuid, role: String },
    /// Delete a user account and everything it owns
    RmUser { user: Uuid },
    /// Show the admin audit trail
    Actions {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

pub async fn run(app: &App, command: AdminCommand) -> Result<()> {
    app.require_session().await?;
    let admin = app.admin();

    match command {
        AdminCommand::Users => {
            for profile in admin.list_users().await? {
                println!(
                    "{}  {:<32} {}",
                    profile.id,
                    profile.email,
                    profile.role.as_str()
                );
            }
        }
        AdminCommand::User { user } => match admin.user_overview(user).await? {
            Some(usage) => {
                println!("Email     {}", usage.email);
                println!("Name      {}", usage.full_name.as_deref().unwrap_or("-"));
                println!("Entries   {}", usage.entry_count);
                println!(
                    "Tracked   {}",
                    format_seconds(usage.total_seconds.max(0) as u64)
                );
            }
            None => println!("No such user."),
        },
        AdminCommand::Analytics => {
            let analytics = admin.analytics().await?;
            println!("Users           {}", analytics.total_users);
            println!("Entries         {}", analytics.total_entries);
            println!(
                "Total tracked   {}",
                format_seconds(analytics.total_seconds.max(0) as u64)
            );
            println!("\nBy user:");
            for usage in &analytics.per_user {
                println!(
                    "  {:<32} {:>9}  {} entries",
                    usage.email,
                    format_seconds(usage.total_seconds.max(0) as u64),
                    usage.entry_count
                );
            }
        }
        AdminCommand::Entries { range } => {
            let range = parse_range(&range)?;
            for entry in admin.all_entries(Some(&range)).await? {
                println!(
                    "{}  {}  {:>9}  user {}",
                    entry.id,
                    entry.start_time.format("%Y-%m-%d %H:%M"),
                    entry.duration_formatted(),
                    entry.user_id
                );
            }
        }
        AdminCommand::Role { user, role } => {
            admin.change_role(user, Role::parse(&role)).await?;
            println!("Role updated.");
        }
        AdminCommand::RmUser { user } => {
            admin.delete_user(user).await?;
            println!("User {} deleted.", user);
        }
        AdminCommand::Actions { limit } => {
            for action in admin.admin_actions(limit).await? {
                println!(
                    "{}  {:<32} admin {}",
                    action.created_at.format("%Y-%m-%d %H:%M"),
                    action.action,
                    action.admin_id
                );
            }
        }
    }
    Ok(())
}
