//! # Initialization
//!
//! Webservice initialization logic including tracing, metrics, configuration,
//! the cipher handle cache and a preflight check of the key pair.

use crate::config::WebserviceConfig;
use crate::constants;
use crate::crypt::{Crypt, CryptCache};
use crate::observability;
use crate::server::{build_cors_layer, ServerState};
use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Initialization result containing all necessary components for the server
#[derive(Debug)]
pub struct InitializationResult {
    /// Loaded configuration
    pub config: WebserviceConfig,
    /// Shared state handed to request handlers
    pub server_state: Arc<ServerState>,
    /// CORS layer built from the allowed origins
    pub cors: CorsLayer,
}

/// Initialize the webservice runtime
///
/// This function handles:
/// - Tracing subscriber setup
/// - Metrics registration
/// - Configuration loading
/// - CORS layer construction (invalid origins are fatal)
/// - Key pair preflight check (failures are logged, not fatal)
///
/// # Errors
///
/// Fails if metrics cannot be registered or an allowed origin is invalid.
pub fn initialize() -> Result<InitializationResult> {
    init_tracing();

    info!("Starting Paas webservice v{}", env!("CARGO_PKG_VERSION"));

    observability::metrics::register_metrics().context("Failed to register metrics")?;

    let config = WebserviceConfig::from_env();
    info!(
        endpoint = %config.endpoint,
        private_key = %config.key_paths.private_key.display(),
        public_key = %config.key_paths.public_key.display(),
        allowed_origins = ?config.allowed_origins,
        "Loaded configuration"
    );

    let cors = build_cors_layer(&config.allowed_origins)
        .context("Invalid allowed origins configuration")?;

    preflight_key_pair(&config);

    let server_state = Arc::new(ServerState::new(CryptCache::new(config.key_paths.clone())));

    Ok(InitializationResult {
        config,
        server_state,
        cors,
    })
}

fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| constants::DEFAULT_LOG_FILTER.into()),
        )
        .try_init()
    {
        eprintln!("Tracing subscriber already initialized: {e}");
    }
}

/// Try to load the key pair once so configuration problems show up at startup
///
/// A failure does not stop the service: every request that needs the keys is
/// rejected until the key files are fixed.
fn preflight_key_pair(config: &WebserviceConfig) {
    match Crypt::from_files(
        &config.key_paths.private_key,
        &config.key_paths.public_key,
        "",
    ) {
        Ok(_) => info!("Key pair loaded successfully"),
        Err(e) => warn!(
            error = %e,
            "Key pair could not be loaded, Paas checks will fail until this is fixed"
        ),
    }
}
