//! # Order Intake API
//!
//! HTTP server that validates submitted orders and forwards accepted ones.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Intake API Server                              │
//! │                                                                         │
//! │  Client ───► HTTP (7071) ───► OrderIntake ───► QueuePublisher          │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                              QueueForwarder             │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                         Redis (received-orders)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use intake_core::{OrderIntake, Validator};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use intake_api::config::IntakeConfig;
use intake_api::publisher::{
    LogOnlyQueue, QueueForwarder, QueuePublisher, RedisQueue, RetryPolicy,
};
use intake_api::routes::build_router;
use intake_api::AppState;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,intake_api=debug,intake_core=debug";

/// How long queued orders may take to drain after the server stops.
const FORWARDER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    info!("Starting Order Intake API server...");

    // Load configuration
    let config = IntakeConfig::load().context("Failed to load configuration")?;
    info!(
        addr = %config.bind_address(),
        queue = %config.order_queue,
        redis = config.redis_url.is_some(),
        "Configuration loaded"
    );

    // Publisher hand-off and its background forwarder
    let (publisher, rx) = QueuePublisher::channel(config.publish_buffer);
    let policy = RetryPolicy {
        max_attempts: config.publish_max_attempts,
        ..RetryPolicy::default()
    };

    let forwarder = match &config.redis_url {
        Some(redis_url) => match RedisQueue::connect(redis_url, config.order_queue.clone()).await {
            Ok(sink) => {
                info!("Connected to Redis");
                tokio::spawn(QueueForwarder::new(rx, sink, policy).run())
            }
            Err(e) => {
                warn!(?e, "Failed to connect to Redis, continuing without it");
                let sink = LogOnlyQueue::new(config.order_queue.clone());
                tokio::spawn(QueueForwarder::new(rx, sink, policy).run())
            }
        },
        None => {
            warn!("REDIS_URL not set; accepted orders will be logged only");
            let sink = LogOnlyQueue::new(config.order_queue.clone());
            tokio::spawn(QueueForwarder::new(rx, sink, policy).run())
        }
    };

    // Create shared state
    let validator = Validator::new(&config.validation());
    let state = Arc::new(AppState {
        intake: OrderIntake::new(validator, Arc::new(publisher)),
        max_body_bytes: config.max_body_bytes,
    });

    let app = build_router(state);

    // Bind the listener
    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;
    info!(addr = %bind_addr, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // The router (and with it the last publisher) is gone; let the forwarder drain
    match tokio::time::timeout(FORWARDER_DRAIN_TIMEOUT, forwarder).await {
        Ok(Ok(stats)) => info!(
            delivered = stats.delivered,
            dropped = stats.dropped,
            "Order forwarder drained"
        ),
        Ok(Err(e)) => error!(?e, "Order forwarder task failed"),
        Err(_) => warn!("Order forwarder did not drain in time; pending orders abandoned"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
