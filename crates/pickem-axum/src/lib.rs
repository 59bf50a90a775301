//! Pickem Axum Integration
//!
//! Session gateway, access guard and extractors for the pick-em service.
//!
//! # Overview
//!
//! - **Gateway**: [`SessionGateway`] implements login, logout, state
//!   inspection and the two-tier verify (sealed cookie, then HTTP Basic)
//! - **Middleware**: [`SessionGuardLayer`] rejects unauthenticated requests
//!   with 401 and clears the session cookie
//! - **Extractors**: [`RequireUser`], [`MaybeUser`]
//!
//! # Quick Start
//!
//! ```ignore
//! use pickem_axum::{RequireUser, SessionGuardLayer};
//! use axum::{Router, routing::get};
//!
//! async fn picks(user: RequireUser) -> String {
//!     format!("Picks for {}", user.email)
//! }
//!
//! let app = Router::new()
//!     .route("/picks", get(picks))
//!     .route_layer(SessionGuardLayer::new(gateway));
//! ```

pub mod basic;
pub mod context;
pub mod cookie;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod layer;

pub use basic::BasicCredentials;
pub use context::{AuthSource, RequestContext};
pub use cookie::{CookieConfig, CookieError, SameSite, DEFAULT_COOKIE_NAME};
pub use error::AuthError;
pub use extractors::{MaybeUser, RequireUser};
pub use gateway::{SessionGateway, Verified};
pub use layer::{SessionGuardLayer, SessionGuardService};
