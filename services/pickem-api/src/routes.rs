//! Router construction

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use pickem_axum::SessionGuardLayer;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers;
use crate::state::AppState;

/// Build the HTTP router with its middleware stack
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();
    let prefix = state.config.route_prefix.clone();

    // Guarded routes first, then route_layer, then the open session routes
    let session_routes = Router::new()
        .route("/whoami", get(handlers::whoami))
        .route_layer(SessionGuardLayer::new(Arc::clone(&state.gateway)))
        .route("/login", get(handlers::login).post(handlers::login))
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .route("/state", get(handlers::session_state));

    // Health routes (no timeout, no prefix)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(request_timeout));

    // Axum refuses to nest at the root
    let app = if prefix.is_empty() {
        Router::new().merge(session_routes)
    } else {
        Router::new().nest(&prefix, session_routes)
    };

    app.layer(middleware)
        .merge(health_routes)
        .with_state(state)
}
