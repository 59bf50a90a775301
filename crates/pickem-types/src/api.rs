//! API request/response types

use serde::{Deserialize, Serialize};

use crate::User;

/// Status envelope returned by the session endpoints.
///
/// Success and failure share the same shape; only `status` differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    /// `"ok"` or `"error"`
    pub status: String,
    /// Human-readable message
    pub message: String,
}

impl StatusEnvelope {
    /// Status value for successful responses
    pub const OK: &'static str = "ok";
    /// Status value for error responses
    pub const ERROR: &'static str = "error";

    /// Create a success envelope
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Self::OK.to_string(),
            message: message.into(),
        }
    }

    /// Create an error envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR.to_string(),
            message: message.into(),
        }
    }

    /// Whether this envelope reports success
    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// Minimal projection of the logged-in user, returned by the state endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginState {
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Login name
    #[serde(rename = "Username")]
    pub username: String,
}

impl From<&User> for LoginState {
    fn from(user: &User) -> Self {
        Self {
            name: user.display_name().to_string(),
            username: user.login().to_string(),
        }
    }
}
