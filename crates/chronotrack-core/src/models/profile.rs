//! User profile data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Profile {
    /// Display name, falling back to the email address
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    /// Parse a role string the way the backend stores it (case-insensitive,
    /// anything unrecognized falls back to member)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            _ => Role::Member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(full_name: Option<&str>, role: Role) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            full_name: full_name.map(String::from),
            avatar_url: None,
            role,
            timezone: "UTC".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_fallback() {
        let p = profile(Some("Ada Lovelace"), Role::Member);
        assert_eq!(p.display_name(), "Ada Lovelace");

        let p = profile(None, Role::Member);
        assert_eq!(p.display_name(), "user@example.com");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("  ADMIN "), Role::Admin);
        assert_eq!(Role::parse("member"), Role::Member);
        assert_eq!(Role::parse("something-else"), Role::Member);
    }

    #[test]
    fn test_is_admin() {
        assert!(profile(None, Role::Admin).is_admin());
        assert!(!profile(None, Role::Member).is_admin());
    }
}
