//! User types

use serde::{Deserialize, Serialize};

/// Unique user identifier, as assigned by the datastore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A pool member's identity.
///
/// The gateway never mutates a `User`; it only seals it into a cookie and
/// hands it to downstream handlers. Fields added later must be optional
/// (`#[serde(default)]`) so cookies issued by older builds still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Datastore ID
    #[serde(default)]
    pub id: UserId,
    /// First name, shown as the display name
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Email address, used as the login name
    pub email: String,
    /// Pool administrator
    #[serde(default)]
    pub admin: bool,
}

impl User {
    /// Create a new non-admin user
    pub fn new(
        id: impl Into<UserId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            admin: false,
        }
    }

    /// Mark the user as a pool administrator
    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Name shown in the UI
    pub fn display_name(&self) -> &str {
        &self.first_name
    }

    /// Name the user logs in with
    pub fn login(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accessors() {
        let user = User::new(7, "Alice", "Tester", "alice@example.com");
        assert_eq!(user.display_name(), "Alice");
        assert_eq!(user.login(), "alice@example.com");
        assert_eq!(user.id, UserId(7));
        assert!(!user.admin);
        assert!(user.with_admin(true).admin);
    }

    #[test]
    fn test_user_ignores_unknown_fields() {
        let json = r#"{"id":3,"first_name":"Bob","email":"bob@example.com","favorite_team":"DAL"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.first_name, "Bob");
        assert_eq!(user.last_name, "");
        assert!(!user.admin);
    }
}
