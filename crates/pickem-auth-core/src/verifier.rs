//! Credential verifier contract
//!
//! The datastore owns users and their secrets; the gateway only asks it
//! whether a login/secret pair is good.

use std::sync::Arc;

use async_trait::async_trait;
use pickem_types::User;

use crate::CredentialError;

/// Checks a login name and plaintext secret against the user store.
///
/// Implementations may block on storage I/O. The gateway applies no
/// timeout of its own.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the matching user, or fail without saying which half was wrong
    async fn check_credentials(&self, login: &str, secret: &str) -> Result<User, CredentialError>;
}

#[async_trait]
impl<V: CredentialVerifier + ?Sized> CredentialVerifier for Arc<V> {
    async fn check_credentials(&self, login: &str, secret: &str) -> Result<User, CredentialError> {
        (**self).check_credentials(login, secret).await
    }
}
