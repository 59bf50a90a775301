//! Pickem Auth Core - Session sealing and credential contracts
//!
//! Core functionality behind the session gateway: key material, the sealed
//! session codec that turns a user into an opaque cookie value and back,
//! and the credential verifier interface implemented by the datastore.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod verifier;

pub use codec::{SealedCodec, SessionIdentity};
pub use config::CodecConfig;
pub use crypto::{EncryptionKey, HmacKey, KeyError, KeyMaterial};
pub use error::{CredentialError, SessionError};
pub use verifier::CredentialVerifier;
