//! Axum extractors for the authenticated user.
//!
//! These read the [`RequestContext`] the session guard attached to the
//! request.
//!
//! # Usage
//!
//! ```ignore
//! use pickem_axum::{MaybeUser, RequireUser};
//!
//! // Behind SessionGuardLayer
//! async fn picks(user: RequireUser) -> String {
//!     format!("Picks for {}", user.email)
//! }
//!
//! async fn banner(user: MaybeUser) -> String {
//!     match user.0 {
//!         Some(user) => format!("Welcome back, {}!", user.first_name),
//!         None => "Welcome!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pickem_types::User;

use crate::context::RequestContext;
use crate::error::AuthError;

/// Extractor that requires an authenticated user.
///
/// Returns 401 if the route is not behind the session guard.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl Deref for RequireUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .map(|ctx| Self(ctx.user().clone()))
            .ok_or(AuthError::LoginRequired)
    }
}

/// Extractor for an optional user.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl Deref for MaybeUser {
    type Target = Option<User>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<RequestContext>()
                .map(|ctx| ctx.user().clone()),
        ))
    }
}
