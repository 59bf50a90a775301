//! Mock credential verifier for testing

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use pickem_auth_core::{CredentialError, CredentialVerifier};
use pickem_types::User;

/// In-memory verifier that counts every call
#[derive(Default, Clone)]
pub struct MockVerifier {
    users: Arc<DashMap<String, (String, User)>>,
    calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MockVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with their secret
    pub fn with_user(self, user: User, secret: &str) -> Self {
        self.users
            .insert(user.email.clone(), (secret.to_string(), user));
        self
    }

    /// Number of credential checks performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every check fail as a store outage
    #[allow(dead_code)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialVerifier for MockVerifier {
    async fn check_credentials(&self, login: &str, secret: &str) -> Result<User, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CredentialError::Unavailable("database is locked".to_string()));
        }

        match self.users.get(login) {
            Some(entry) if entry.value().0 == secret => Ok(entry.value().1.clone()),
            _ => Err(CredentialError::InvalidCredentials),
        }
    }
}
