//! Session handlers (login, logout, state, whoami)

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use pickem_axum::{AuthError, RequireUser};
use pickem_types::{LoginState, StatusEnvelope, User};

use crate::state::AppState;

/// POST|GET {prefix}/login
///
/// Check Basic credentials and issue a session cookie
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let cookie = state.gateway.login(&headers).await?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(StatusEnvelope::ok("successfully logged in")),
    ))
}

/// POST|GET {prefix}/logout
///
/// Clear the session cookie, valid or not
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let cookie = state.gateway.logout(&headers)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(StatusEnvelope::ok("successful logout")),
    ))
}

/// GET {prefix}/state
///
/// Report who the session cookie belongs to
pub async fn session_state(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LoginState>, AuthError> {
    state.gateway.state(&headers).map(Json)
}

/// GET {prefix}/whoami (guarded)
pub async fn whoami(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}
