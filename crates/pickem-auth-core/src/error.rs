//! Auth errors

use thiserror::Error;

/// Session sealing errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Token failed to unseal (tampered, expired, wrong key, wrong name,
    /// malformed). Deliberately carries no reason.
    #[error("invalid session")]
    InvalidSession,

    /// Sealed token would exceed the configured maximum length
    #[error("session token too long: {length} bytes exceeds {max}")]
    PayloadTooLong { length: usize, max: usize },

    /// Identity could not be serialized
    #[error("failed to serialize session: {0}")]
    Serialization(String),

    /// Payload could not be encrypted
    #[error("failed to encrypt session")]
    Encryption,
}

impl SessionError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSession => 401,
            Self::PayloadTooLong { .. } | Self::Serialization(_) | Self::Encryption => 500,
        }
    }
}

/// Credential verification errors, as reported by a [`crate::CredentialVerifier`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Unknown login or wrong secret. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Backing store failed
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

impl CredentialError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials => 401,
            Self::Unavailable(_) => 500,
        }
    }
}
