//! HTTP Basic credentials.

use axum::http::header::{self, HeaderMap};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Login name and secret from an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Login name (email)
    pub login: String,
    secret: String,
}

impl BasicCredentials {
    /// Create credentials directly
    pub fn new(login: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            secret: secret.into(),
        }
    }

    /// Plaintext secret
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Parse credentials from the `Authorization` header.
    ///
    /// Returns `None` when the header is absent, uses another scheme, or is
    /// not `base64(login ":" secret)`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.trim_start().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("Basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (login, secret) = decoded.split_once(':')?;

        Some(Self::new(login, secret))
    }

    /// Render as an `Authorization` header value
    pub fn to_header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.login, self.secret));
        format!("Basic {encoded}")
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}
