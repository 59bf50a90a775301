//! HTTP handlers

mod auth;
mod health;

pub use auth::{login, logout, session_state, whoami};
pub use health::{health, ready};
