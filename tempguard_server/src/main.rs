//! Tempguard Server - disposable email and temporary phone checks
//!
//! This server handles:
//! - `GET /check?email=` disposable email domain checks
//! - `GET /check-phone?phone=` temporary phone number checks
//! - Background refresh of both lists every few hours

use std::net::SocketAddr;
use std::sync::Arc;
use tempguard_core::{EmailDetector, PhoneDetector, RefreshSupervisor};
use tempguard_server::{config, routes};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tempguard_server=debug,tempguard_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting Tempguard server on {}", config.bind_addr());
    tracing::info!("Snapshot directory: {}", config.detectors.data_dir.display());
    tracing::info!(
        "Refresh interval: {}s",
        config.detectors.refresh_interval.as_secs()
    );

    // Build detectors and start their refresh tasks
    let email = Arc::new(EmailDetector::from_config(&config.detectors)?);
    let phone = Arc::new(PhoneDetector::from_config(&config.detectors)?);

    let mut refreshers = RefreshSupervisor::new();
    refreshers.spawn(email.clone(), config.detectors.refresh_interval);
    refreshers.spawn(phone.clone(), config.detectors.refresh_interval);

    let app = routes::build_router(routes::AppState::new(email, phone))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = config.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    tracing::info!("Stopping refresh tasks...");
    refreshers.shutdown().await;

    if let Err(e) = served {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
