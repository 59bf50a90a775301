//! Pick-em API
//!
//! Session service for the NFL pick-em pool. Users log in with HTTP Basic
//! credentials and receive a sealed session cookie; every later request is
//! resolved from that cookie without touching the user directory.
//!
//! ## Session Endpoints (under `ROUTE_PREFIX`)
//!
//! - `POST|GET /login` - Check Basic credentials, set the session cookie
//! - `POST|GET /logout` - Clear the session cookie
//! - `GET /state` - Who the session cookie belongs to
//! - `GET /whoami` - Full identity (guarded, accepts cookie or Basic)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe

mod config;
mod directory;
mod handlers;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use pickem_auth_core::SealedCodec;
use pickem_axum::{CookieConfig, SessionGateway};
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::directory::UserDirectory;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("pickem_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pick-em API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        route_prefix = %config.route_prefix,
        max_age_secs = config.codec.max_age.as_secs(),
        cookie_secure = config.cookie_secure,
        "Configuration loaded"
    );

    // Load user directory
    let directory = UserDirectory::load(&config.users_file)?;
    tracing::info!(
        users = directory.len(),
        path = %config.users_file.display(),
        "User directory loaded"
    );
    if directory.is_empty() {
        tracing::warn!("User directory is empty; every login will fail");
    }

    // Create session gateway
    let codec = SealedCodec::new(config.codec.clone());
    let cookies = CookieConfig::new().with_secure(config.cookie_secure);
    let gateway = SessionGateway::new(codec, Arc::new(directory), cookies)?;

    // Create application state
    let state = AppState::new(gateway, config.clone());

    // Build HTTP router
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_http_server(app: axum::Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
