//! Request-scoped authentication context.
//!
//! The [`RequestContext`] is inserted into request extensions by the
//! session guard and read back through the extractors. Only the guard can
//! create one, so its presence always means the request was verified.

use pickem_types::User;

/// How the request's identity was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Sealed session cookie.
    Cookie,
    /// HTTP Basic credentials; a fresh cookie was issued.
    BasicAuth,
}

/// Identity resolved for the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    user: User,
    source: AuthSource,
}

impl RequestContext {
    pub(crate) fn new(user: User, source: AuthSource) -> Self {
        Self { user, source }
    }

    /// The authenticated user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Where the identity came from.
    #[must_use]
    pub fn source(&self) -> AuthSource {
        self.source
    }

    /// Take the user out of the context.
    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }
}
