//! Backend authentication types and local session persistence

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Minimal auth-service view of the signed-in user; the full profile row
/// lives in the `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

/// OS-keyring backed session cache so the CLI survives between invocations
pub struct TokenCache {
    service: String,
}

const KEYRING_USER: &str = "session";

impl TokenCache {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, KEYRING_USER)?)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let serialized = serde_json::to_string(session)?;
        self.entry()?.set_password(&serialized)?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<Session>> {
        match self.entry()?.get_password() {
            Ok(serialized) => Ok(Some(serde_json::from_str(&serialized)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
