//! Sealed session codec
//!
//! Turns an identity into an opaque, encrypted and authenticated cookie
//! value, and back. Token layout before base64 (URL-safe, unpadded):
//!
//! ```text
//! timestamp (8, big-endian unix seconds) | nonce (24) | ciphertext | tag (32)
//! ```
//!
//! The ciphertext is XChaCha20-Poly1305 over a versioned JSON envelope with
//! the cookie name as associated data. The tag is HMAC-SHA256 over
//! `name | timestamp | nonce | ciphertext`.
//!
//! Every unseal failure collapses into [`SessionError::InvalidSession`]. The
//! concrete reason is only ever logged at debug level.

use std::marker::PhantomData;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use pickem_types::User;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::crypto::{NONCE_LEN, TAG_LEN};
use crate::SessionError;

const TIMESTAMP_LEN: usize = 8;
/// Poly1305 tag appended to every ciphertext
const AEAD_TAG_LEN: usize = 16;
const MIN_RAW_LEN: usize = TIMESTAMP_LEN + NONCE_LEN + AEAD_TAG_LEN + TAG_LEN;

/// An identity shape that can be carried inside a sealed session.
///
/// `SCHEMA` and `VERSION` are written into every payload and checked on
/// unseal, so a token issued for one shape never decodes as another.
pub trait SessionIdentity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable schema name
    const SCHEMA: &'static str;
    /// Schema version. Bump when a change is not backward compatible.
    const VERSION: u16;
}

impl SessionIdentity for User {
    const SCHEMA: &'static str = "pickem.user";
    const VERSION: u16 = 1;
}

#[derive(Serialize)]
struct SealEnvelope<'a, T> {
    schema: &'a str,
    v: u16,
    identity: &'a T,
}

// Unknown envelope fields are ignored so newer issuers stay readable.
#[derive(Deserialize)]
struct OpenEnvelope<T> {
    schema: String,
    v: u16,
    identity: T,
}

/// Why a token was rejected. Never leaves this module.
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("token exceeds {0} bytes")]
    TooLong(usize),
    #[error("token is not valid base64")]
    Encoding,
    #[error("token is truncated")]
    Truncated,
    #[error("integrity tag mismatch")]
    TagMismatch,
    #[error("token expired {0}s ago")]
    Expired(i64),
    #[error("token timestamp is in the future")]
    FromFuture,
    #[error("payload failed to decrypt")]
    Decrypt,
    #[error("payload is not a session envelope")]
    Payload,
    #[error("schema {schema} v{version} does not match")]
    Schema { schema: String, version: u16 },
}

/// Seals and unseals identities of type `T`.
///
/// Construct once at startup and share; the codec holds no mutable state.
pub struct SealedCodec<T: SessionIdentity = User> {
    config: Arc<CodecConfig>,
    _identity: PhantomData<fn() -> T>,
}

impl<T: SessionIdentity> Clone for SealedCodec<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            _identity: PhantomData,
        }
    }
}

impl<T: SessionIdentity> std::fmt::Debug for SealedCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedCodec")
            .field("schema", &T::SCHEMA)
            .field("version", &T::VERSION)
            .field("max_age", &self.config.max_age)
            .finish_non_exhaustive()
    }
}

impl<T: SessionIdentity> SealedCodec<T> {
    /// Create a new codec
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config: Arc::new(config),
            _identity: PhantomData,
        }
    }

    /// Codec configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Seal `identity` for the cookie called `name`
    pub fn seal(&self, name: &str, identity: &T) -> Result<String, SessionError> {
        self.seal_at(name, identity, Utc::now())
    }

    /// Seal with an explicit issue time
    pub fn seal_at(
        &self,
        name: &str,
        identity: &T,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let payload = serde_json::to_vec(&SealEnvelope {
            schema: T::SCHEMA,
            v: T::VERSION,
            identity,
        })
        .map_err(|e| {
            tracing::error!("Failed to serialize session payload: {}", e);
            SessionError::Serialization(e.to_string())
        })?;

        let (nonce, ciphertext) = self
            .config
            .keys
            .encryption()
            .encrypt(name.as_bytes(), &payload)
            .map_err(|_| {
                tracing::error!("Failed to encrypt session payload");
                SessionError::Encryption
            })?;

        let timestamp = now.timestamp().to_be_bytes();
        let tag = self.config.keys.authentication().sign(&[
            name.as_bytes(),
            &timestamp,
            &nonce,
            &ciphertext,
        ]);

        let mut raw = Vec::with_capacity(MIN_RAW_LEN + payload.len());
        raw.extend_from_slice(&timestamp);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        raw.extend_from_slice(&tag);

        let token = URL_SAFE_NO_PAD.encode(&raw);
        if token.len() > self.config.max_length {
            return Err(SessionError::PayloadTooLong {
                length: token.len(),
                max: self.config.max_length,
            });
        }

        Ok(token)
    }

    /// Unseal a token issued for the cookie called `name`
    pub fn unseal(&self, name: &str, token: &str) -> Result<T, SessionError> {
        self.unseal_at(name, token, Utc::now())
    }

    /// Unseal, judging expiry against `now`
    pub fn unseal_at(&self, name: &str, token: &str, now: DateTime<Utc>) -> Result<T, SessionError> {
        self.open(name, token, now).map_err(|reason| {
            tracing::debug!(cookie = name, %reason, "Rejected session token");
            SessionError::InvalidSession
        })
    }

    fn open(&self, name: &str, token: &str, now: DateTime<Utc>) -> Result<T, Rejection> {
        if token.len() > self.config.max_length {
            return Err(Rejection::TooLong(self.config.max_length));
        }

        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| Rejection::Encoding)?;
        if raw.len() < MIN_RAW_LEN {
            return Err(Rejection::Truncated);
        }

        let (body, tag) = raw.split_at(raw.len() - TAG_LEN);
        let (timestamp, rest) = body.split_at(TIMESTAMP_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        // Authenticate before touching anything else
        if !self
            .config
            .keys
            .authentication()
            .verify(&[name.as_bytes(), timestamp, nonce, ciphertext], tag)
        {
            return Err(Rejection::TagMismatch);
        }

        let mut ts_bytes = [0u8; TIMESTAMP_LEN];
        ts_bytes.copy_from_slice(timestamp);
        self.check_age(i64::from_be_bytes(ts_bytes), now)?;

        let payload = self
            .config
            .keys
            .encryption()
            .decrypt(name.as_bytes(), nonce, ciphertext)
            .map_err(|_| Rejection::Decrypt)?;

        let envelope: OpenEnvelope<T> =
            serde_json::from_slice(&payload).map_err(|_| Rejection::Payload)?;
        if envelope.schema != T::SCHEMA || envelope.v != T::VERSION {
            return Err(Rejection::Schema {
                schema: envelope.schema,
                version: envelope.v,
            });
        }

        Ok(envelope.identity)
    }

    fn check_age(&self, issued: i64, now: DateTime<Utc>) -> Result<(), Rejection> {
        let now = now.timestamp();
        let skew = i64::try_from(self.config.clock_skew.as_secs()).unwrap_or(i64::MAX);
        if issued > now.saturating_add(skew) {
            return Err(Rejection::FromFuture);
        }

        if !self.config.max_age.is_zero() {
            let max_age = i64::try_from(self.config.max_age.as_secs()).unwrap_or(i64::MAX);
            let age = now.saturating_sub(issued);
            if age > max_age {
                return Err(Rejection::Expired(age - max_age));
            }
        }

        Ok(())
    }
}
