//! Ratekeeper - admission-gated demo server
//!
//! Serves a demo route behind per-caller admission control, with token
//! buckets held in an expiring LRU cache.

mod api;
mod cache;
mod config;
mod error;
mod limit;
mod models;
mod tasks;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;

/// Main entry point for the Ratekeeper demo server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the per-caller limiter registry
/// 4. Start the background expiry reaper
/// 5. Create the Axum router with the admission middleware
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM, stopping the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratekeeper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ratekeeper");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: max_tracked_callers={}, rate={}/s, burst={}, idle_ttl={}s, reaper_interval={}s, port={}",
        config.max_tracked_callers,
        config.limiter_rate,
        config.limiter_burst,
        config.limiter_idle_ttl,
        config.reaper_interval,
        config.server_port
    );

    // Create application state with the limiter registry
    let state = AppState::from_config(&config)?;
    info!("Limiter registry initialized");

    // Start the background reaper for idle callers' buckets
    let reaper = state
        .limiter
        .start_reaper(Duration::from_secs(config.reaper_interval));
    info!("Background expiry reaper started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Connect info is required so the middleware can key on peer addresses
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Stop the reaper deterministically before exiting
    reaper.shutdown().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
