//! # Paas Webservice
//!
//! HTTP service that checks whether every encrypted SSH secret in a Paas can be
//! decrypted with the service's private key, and encrypts secrets for Paas
//! owners.
//!
//! ## Configuration
//!
//! - `PAAS_PRIVATE_KEY_PATH` - private key (default `/secrets/paas/privateKey`)
//! - `PAAS_PUBLIC_KEY_PATH` - public key (default `/secrets/paas/publicKey`)
//! - `PAAS_ENDPOINT` - listen address (default `0.0.0.0:8080`)
//! - `PAAS_WS_ALLOWED_ORIGINS` - comma-separated CORS origins, `*` for any
//! - `RUST_LOG` - log filter (default `paas_webservice=info`)

use anyhow::Result;
use paas_webservice::runtime::initialization::initialize;
use paas_webservice::server::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    let init_result = initialize()?;

    start_server(
        init_result.config.endpoint,
        init_result.server_state,
        init_result.cors,
    )
    .await
}
