//! # HTTP Server
//!
//! Axum server exposing the admission API, health probes and metrics.
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | POST | `/v1/checkpaas` | Check that every SSH secret of a Paas can be decrypted |
//! | POST | `/v1/encrypt` | Encrypt a secret for a Paas |
//! | GET | `/healthz` | Liveness probe |
//! | GET | `/readyz` | Readiness probe |
//! | GET | `/version` | Service version |
//! | GET | `/metrics` | Prometheus metrics |

mod cors;
mod handlers;

pub use cors::build_cors_layer;
pub use handlers::{CheckPaasResponse, EncryptRequest, EncryptResponse, VersionResponse};

use crate::constants::MAX_REQUEST_BODY_BYTES;
use crate::crypt::CryptCache;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared by all request handlers
#[derive(Debug)]
pub struct ServerState {
    /// Cipher handles per Paas name
    pub crypts: CryptCache,
    /// Set once the listener is bound
    pub is_ready: AtomicBool,
}

impl ServerState {
    pub fn new(crypts: CryptCache) -> Self {
        Self {
            crypts,
            is_ready: AtomicBool::new(false),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        .route("/metrics", get(handlers::metrics))
        .route("/v1/checkpaas", post(handlers::check_paas))
        .route("/v1/encrypt", post(handlers::encrypt))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES)),
        )
        .with_state(state)
}

/// Bind `endpoint` and serve until ctrl-c or SIGTERM
///
/// # Errors
///
/// Fails if the listener cannot be bound or the server stops with an error.
pub async fn start_server(
    endpoint: SocketAddr,
    state: Arc<ServerState>,
    cors: CorsLayer,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(endpoint)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {endpoint}"))?;

    state.is_ready.store(true, Ordering::Relaxed);
    info!("Paas webservice listening on http://{}", endpoint);

    axum::serve(listener, router(state, cors))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl-c: {}", e);
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
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received, stopping HTTP server");
}
