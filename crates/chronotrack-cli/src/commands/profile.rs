//! Own-profile subcommands

use anyhow::Result;
use clap::Subcommand;

use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in profile
    Show,
    /// Update display name and timezone
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Change the account password
    Password { new_password: String },
}

pub async fn run(app: &App, command: ProfileCommand) -> Result<()> {
    let profile = app.require_session().await?;

    match command {
        ProfileCommand::Show => {
            println!("Email     {}", profile.email);
            println!("Name      {}", profile.full_name.as_deref().unwrap_or("-"));
            println!("Timezone  {}", profile.timezone);
            println!("Role      {}", profile.role.as_str());
        }
        ProfileCommand::Set { name, timezone } => {
            let updated = app.profile().update(name, timezone).await?;
            println!("Profile updated ({}).", updated.display_name());
        }
        ProfileCommand::Password { new_password } => {
            app.profile().change_password(&new_password).await?;
            println!("Password changed.");
        }
    }
    Ok(())
}
