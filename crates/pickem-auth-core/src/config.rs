//! Configuration types for the session codec

use std::time::Duration;

use crate::crypto::KeyMaterial;

/// Sealed session codec configuration
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Authentication and encryption keys
    pub keys: KeyMaterial,
    /// Oldest token accepted on unseal. Zero disables the check.
    pub max_age: Duration,
    /// How far in the future a token timestamp may be
    pub clock_skew: Duration,
    /// Longest encoded token, in bytes, that will be issued or accepted
    pub max_length: usize,
}

impl CodecConfig {
    /// Default token lifetime
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);
    /// Default allowed clock skew
    pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(60);
    /// Default maximum token length (fits in a single cookie)
    pub const DEFAULT_MAX_LENGTH: usize = 4096;

    /// Create a new codec config
    pub fn new(keys: KeyMaterial) -> Self {
        Self {
            keys,
            max_age: Self::DEFAULT_MAX_AGE,
            clock_skew: Self::DEFAULT_CLOCK_SKEW,
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }

    /// Set maximum token age
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set allowed clock skew
    #[must_use]
    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    /// Set maximum token length
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}
