//! Error types for the session gateway and guard.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pickem_auth_core::{CredentialError, SessionError};
use pickem_types::StatusEnvelope;

use crate::cookie::CookieError;

/// Message for every authentication failure. Never says why.
pub const LOGIN_REQUIRED: &str = "login required";

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable Basic credentials on a login request.
    #[error("missing credentials")]
    MissingCredentials,

    /// No valid session cookie where one is required.
    #[error("login required")]
    LoginRequired,

    /// Neither a valid cookie nor Basic credentials were presented.
    #[error("no login information found")]
    NoLogin,

    /// Credential verifier failure while verifying a request.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// Credential verifier failure on an explicit login. Always a server
    /// error carrying the verifier's message.
    #[error(transparent)]
    LoginFailed(CredentialError),

    /// Session codec failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Cookie header could not be read or written.
    #[error(transparent)]
    Cookie(#[from] CookieError),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredentials => StatusCode::BAD_REQUEST,
            Self::LoginRequired | Self::NoLogin => StatusCode::UNAUTHORIZED,
            Self::Credentials(e) => status_from(e.status_code()),
            Self::Session(e) => status_from(e.status_code()),
            Self::LoginFailed(_) | Self::Cookie(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => LOGIN_REQUIRED.to_string(),
            _ => self.to_string(),
        }
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Session gateway error");
        }

        (status, Json(StatusEnvelope::error(self.public_message()))).into_response()
    }
}
