//! configure / login / logout

use anyhow::{Context, Result};

use crate::app::App;
use crate::config::CliConfig;

pub fn configure(base_url: String, api_key: String) -> Result<()> {
    let config = CliConfig { base_url, api_key };
    config.save()?;
    println!("Backend configured.");
    Ok(())
}

pub async fn login(app: &App, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => std::env::var("CHRONOTRACK_PASSWORD")
            .context("Pass --password or set CHRONOTRACK_PASSWORD")?,
    };

    let credentials = chronotrack_store::Credentials {
        email: email.clone(),
        password,
    };
    let session = app.store.sign_in(&credentials).await?;
    app.token_cache.save(&session)?;

    let profile = app.session.restore(&session).await?;
    println!("Signed in as {}", profile.display_name());
    if app.timer.is_running().await {
        println!("A timer is running; `chronotrack timer status` for details.");
    }
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    if let Ok(Some(session)) = app.token_cache.load() {
        app.store.set_session(&session).await;
    }
    app.session.sign_out().await.ok();
    app.token_cache.clear()?;
    println!("Signed out.");
    Ok(())
}
