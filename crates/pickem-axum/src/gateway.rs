//! Session gateway.
//!
//! Establishes, inspects and tears down sessions. All session state lives
//! in the sealed cookie the client holds; the gateway itself is immutable
//! and shared across requests.
//!
//! Per request the gateway reads or writes at most one cookie and calls the
//! credential verifier at most once.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use pickem_auth_core::{CredentialError, CredentialVerifier, SealedCodec};
use pickem_types::{LoginState, User};

use crate::basic::BasicCredentials;
use crate::context::AuthSource;
use crate::cookie::{CookieConfig, CookieError};
use crate::error::AuthError;

/// Outcome of a successful [`SessionGateway::verify`].
#[derive(Debug, Clone)]
pub struct Verified {
    /// The resolved user
    pub user: User,
    /// How the user was resolved
    pub source: AuthSource,
    /// Fresh `Set-Cookie` value when the user came from Basic credentials
    pub cookie: Option<HeaderValue>,
}

/// Login, logout, state inspection and verification.
pub struct SessionGateway {
    codec: SealedCodec<User>,
    verifier: Arc<dyn CredentialVerifier>,
    cookies: CookieConfig,
}

impl SessionGateway {
    /// Create a new gateway.
    ///
    /// # Errors
    /// Returns error if the cookie name or path cannot appear in a header.
    pub fn new(
        codec: SealedCodec<User>,
        verifier: Arc<dyn CredentialVerifier>,
        cookies: CookieConfig,
    ) -> Result<Self, CookieError> {
        cookies.validate()?;
        Ok(Self {
            codec,
            verifier,
            cookies,
        })
    }

    /// Cookie attributes in use
    pub fn cookie_config(&self) -> &CookieConfig {
        &self.cookies
    }

    /// Log in with HTTP Basic credentials.
    ///
    /// Returns the `Set-Cookie` value for the new session. A cookie on the
    /// request is ignored; login always checks credentials. Any verifier
    /// failure, including bad credentials, is a server error here.
    pub async fn login(&self, headers: &HeaderMap) -> Result<HeaderValue, AuthError> {
        let credentials =
            BasicCredentials::from_headers(headers).ok_or(AuthError::MissingCredentials)?;

        let user = self
            .check(&credentials)
            .await
            .map_err(AuthError::LoginFailed)?;
        let cookie = self.issue_cookie(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(cookie)
    }

    /// Log out.
    ///
    /// Always returns a clearing `Set-Cookie` value, whether or not the
    /// presented cookie was valid. Fails only if the `Cookie` header itself
    /// cannot be read.
    pub fn logout(&self, headers: &HeaderMap) -> Result<HeaderValue, AuthError> {
        let had_cookie = self.cookies.read(headers)?.is_some();
        tracing::info!(had_cookie, "User logged out");
        Ok(self.cookies.clear()?)
    }

    /// Report who the current cookie belongs to.
    ///
    /// Never falls back to Basic credentials.
    pub fn state(&self, headers: &HeaderMap) -> Result<LoginState, AuthError> {
        let user = self.session_user(headers).ok_or(AuthError::LoginRequired)?;
        Ok(LoginState::from(&user))
    }

    /// Resolve the caller: sealed cookie first, then Basic credentials.
    ///
    /// The cookie path makes no verifier call. The Basic path issues a new
    /// cookie so later requests take the cookie path.
    pub async fn verify(&self, headers: &HeaderMap) -> Result<Verified, AuthError> {
        if let Some(user) = self.session_user(headers) {
            return Ok(Verified {
                user,
                source: AuthSource::Cookie,
                cookie: None,
            });
        }

        let credentials = BasicCredentials::from_headers(headers).ok_or(AuthError::NoLogin)?;
        let user = self.check(&credentials).await.map_err(AuthError::Credentials)?;
        let cookie = self.issue_cookie(&user)?;

        tracing::debug!(user_id = %user.id, "Session re-issued from Basic credentials");
        Ok(Verified {
            user,
            source: AuthSource::BasicAuth,
            cookie: Some(cookie),
        })
    }

    async fn check(&self, credentials: &BasicCredentials) -> Result<User, CredentialError> {
        self.verifier
            .check_credentials(&credentials.login, credentials.secret())
            .await
            .inspect_err(|e| {
                tracing::warn!(login = %credentials.login, error = %e, "Credential check failed");
            })
    }

    fn session_user(&self, headers: &HeaderMap) -> Option<User> {
        let token = self.cookies.read(headers).ok().flatten()?;
        self.codec.unseal(&self.cookies.name, &token).ok()
    }

    fn issue_cookie(&self, user: &User) -> Result<HeaderValue, AuthError> {
        let token = self.codec.seal(&self.cookies.name, user)?;
        Ok(self.cookies.issue(&token)?)
    }
}

impl std::fmt::Debug for SessionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGateway")
            .field("codec", &self.codec)
            .field("cookies", &self.cookies)
            .finish_non_exhaustive()
    }
}
