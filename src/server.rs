//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, index setup, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::persistence::{
    InMemoryLinkRepository, RedisLinkRepository, RedisStoreOptions,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound on waiting for queued visits after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis store and search index (or the in-memory store if Redis is not configured)
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Redis connection or index creation fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);
    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        repository.clone(),
        config.visit_worker_concurrency,
    ));
    tracing::info!("Visit worker started");

    let state = AppState::new(repository, visit_tx, config.base_url.clone());
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last visit senders; the worker now drains and exits.
    tracing::info!("Server stopped, draining visit queue");
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Visit worker failed: {}", e),
        Err(_) => tracing::warn!("Visit worker did not drain within {:?}", WORKER_DRAIN_TIMEOUT),
    }

    Ok(())
}

/// Connects the configured store.
///
/// With Redis configured, the search index is created if it does not exist.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let Some(redis_url) = &config.redis_url else {
        tracing::warn!("Redis is not configured, links are kept in memory only");
        return Ok(Arc::new(InMemoryLinkRepository::new()));
    };

    let options = RedisStoreOptions {
        index_name: config.redis_index.clone(),
        operation_timeout: config.store_timeout(),
    };

    let repository = RedisLinkRepository::connect(redis_url, options)
        .await
        .context("Failed to connect to Redis")?;

    if repository
        .ensure_index()
        .await
        .context("Failed to prepare search index")?
    {
        tracing::info!("Created search index '{}'", config.redis_index);
    }

    Ok(Arc::new(repository))
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
