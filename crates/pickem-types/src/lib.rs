//! Pickem Types - Shared domain types
//!
//! This crate contains the types passed between the session gateway and
//! the service that mounts it:
//! - User identity carried inside sealed session cookies
//! - JSON envelopes returned by the login/logout/state endpoints

pub mod api;
pub mod user;

pub use api::*;
pub use user::*;
