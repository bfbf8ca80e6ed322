//! Per-invocation wiring of store, controllers and managers

use std::sync::Arc;

use anyhow::Result;

use chronotrack_app::{
    ActivityFeed, ActivityLogger, AdminManager, BoardManager, ClientManager, EntryManager,
    ProfileManager, ProjectManager, ReportManager, SessionManager, TimerController,
};
use chronotrack_core::models::Profile;
use chronotrack_store::{StoreClient, TokenCache};

use crate::config::CliConfig;

const KEYRING_SERVICE: &str = "chronotrack";

pub struct App {
    pub store: Arc<StoreClient>,
    pub timer: Arc<TimerController>,
    pub session: Arc<SessionManager>,
    pub activity: Arc<ActivityLogger>,
    pub token_cache: TokenCache,
}

impl App {
    pub fn new(config: &CliConfig) -> Self {
        let store = Arc::new(StoreClient::new(&config.base_url, &config.api_key));
        let activity = Arc::new(ActivityLogger::new(store.clone()));
        let timer = Arc::new(TimerController::new(store.clone(), activity.clone()));
        let session = Arc::new(SessionManager::new(store.clone(), timer.clone()));

        Self {
            store,
            timer,
            session,
            activity,
            token_cache: TokenCache::new(KEYRING_SERVICE),
        }
    }

    /// Restore the cached session or tell the user to sign in
    pub async fn require_session(&self) -> Result<Profile> {
        let session = self
            .token_cache
            .load()?
            .ok_or_else(|| anyhow::anyhow!("Not signed in; run `chronotrack login`"))?;
        Ok(self.session.restore(&session).await?)
    }

    pub fn clients(&self) -> ClientManager {
        ClientManager::new(self.store.clone(), self.activity.clone(), self.session.clone())
    }

    pub fn projects(&self) -> ProjectManager {
        ProjectManager::new(self.store.clone(), self.activity.clone(), self.session.clone())
    }

    pub fn entries(&self) -> EntryManager {
        EntryManager::new(self.store.clone(), self.activity.clone(), self.session.clone())
    }

    pub fn boards(&self) -> BoardManager {
        BoardManager::new(self.store.clone(), self.activity.clone(), self.session.clone())
    }

    pub fn reports(&self) -> ReportManager {
        ReportManager::new(self.store.clone(), self.session.clone())
    }

    pub fn feed(&self) -> ActivityFeed {
        ActivityFeed::new(self.store.clone(), self.session.clone())
    }

    pub fn profile(&self) -> ProfileManager {
        ProfileManager::new(self.store.clone(), self.activity.clone(), self.session.clone())
    }

    pub fn admin(&self) -> AdminManager {
        AdminManager::new(self.store.clone(), self.session.clone())
    }
}
