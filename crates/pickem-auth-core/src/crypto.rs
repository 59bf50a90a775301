//! Key material and cryptographic primitives for sealed sessions
//!
//! Sessions are encrypted with XChaCha20-Poly1305 and then authenticated
//! with HMAC-SHA256 under a second, independent key. Both keys are loaded
//! once at startup and never change for the life of the process.

use std::sync::Arc;

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Length of an HMAC-SHA256 tag in bytes
pub const TAG_LEN: usize = 32;

/// Length of an XChaCha20-Poly1305 nonce in bytes
pub const NONCE_LEN: usize = 24;

/// Pre-validated HMAC key for repeated signing.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns error if key is too short (less than 32 bytes).
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(KeyError::AuthKeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    fn create_hmac(&self) -> Hmac<Sha256> {
        <Hmac<Sha256> as Mac>::new_from_slice(&self.key_bytes)
            .expect("HMAC accepts keys of any length")
    }

    /// Sign the concatenation of `parts` and return the tag
    pub fn sign(&self, parts: &[&[u8]]) -> [u8; TAG_LEN] {
        let mut mac = self.create_hmac();
        for part in parts {
            mac.update(part);
        }
        mac.finalize().into_bytes().into()
    }

    /// Verify a tag over `parts` in constant time
    pub fn verify(&self, parts: &[&[u8]], tag: &[u8]) -> bool {
        let expected = self.sign(parts);
        expected.as_slice().ct_eq(tag).into()
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Symmetric key used to encrypt session payloads.
#[derive(Clone)]
pub struct EncryptionKey {
    cipher: XChaCha20Poly1305,
}

impl EncryptionKey {
    /// Required key length in bytes
    pub const KEY_LENGTH: usize = 32;

    /// Create a new encryption key from exactly 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let key_bytes = key.as_ref();
        let cipher = XChaCha20Poly1305::new_from_slice(key_bytes).map_err(|_| {
            KeyError::EncryptionKeyLength {
                actual: key_bytes.len(),
                expected: Self::KEY_LENGTH,
            }
        })?;
        Ok(Self { cipher })
    }

    /// Encrypt `plaintext` under a fresh random nonce, binding `aad`.
    pub fn encrypt(
        &self,
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<([u8; NONCE_LEN], Vec<u8>), chacha20poly1305::Error> {
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self.cipher.encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(&nonce);
        Ok((nonce_bytes, ciphertext))
    }

    /// Decrypt and authenticate `ciphertext`.
    pub fn decrypt(
        &self,
        aad: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, chacha20poly1305::Error> {
        if nonce.len() != NONCE_LEN {
            return Err(chacha20poly1305::Error);
        }
        self.cipher.decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey").finish_non_exhaustive()
    }
}

/// The two long-lived secrets a deployment seals sessions with.
///
/// Changing either key invalidates every session issued under the old pair.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    authentication: HmacKey,
    encryption: EncryptionKey,
}

impl KeyMaterial {
    /// Build key material from raw bytes
    pub fn new(
        authentication_key: impl AsRef<[u8]>,
        encryption_key: impl AsRef<[u8]>,
    ) -> Result<Self, KeyError> {
        Ok(Self {
            authentication: HmacKey::new(authentication_key)?,
            encryption: EncryptionKey::new(encryption_key)?,
        })
    }

    /// Build key material from hex-encoded keys
    pub fn from_hex(authentication_key: &str, encryption_key: &str) -> Result<Self, KeyError> {
        let authentication = hex::decode(authentication_key.trim())
            .map_err(|e| KeyError::InvalidHex("authentication", e.to_string()))?;
        let encryption = hex::decode(encryption_key.trim())
            .map_err(|e| KeyError::InvalidHex("encryption", e.to_string()))?;
        Self::new(authentication, encryption)
    }

    /// Key used for integrity tags
    pub fn authentication(&self) -> &HmacKey {
        &self.authentication
    }

    /// Key used for payload confidentiality
    pub fn encryption(&self) -> &EncryptionKey {
        &self.encryption
    }
}

/// Errors that can occur when loading key material
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("authentication key too short: got {actual} bytes, need at least {minimum}")]
    AuthKeyTooShort { actual: usize, minimum: usize },

    #[error("encryption key has wrong length: got {actual} bytes, need exactly {expected}")]
    EncryptionKeyLength { actual: usize, expected: usize },

    #[error("{0} key is not valid hex: {1}")]
    InvalidHex(&'static str, String),
}
