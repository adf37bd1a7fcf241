//! # Webservice Configuration
//!
//! Configuration loaded from environment variables.
//!
//! All settings have defaults suited to running in a cluster, where the key
//! pair is mounted from a Kubernetes secret.

mod origins;

pub use origins::AllowedOrigins;

use crate::constants::{
    ALLOWED_ORIGINS_ENV, DEFAULT_ENDPOINT, DEFAULT_PRIVATE_KEY_PATH, DEFAULT_PUBLIC_KEY_PATH,
    ENDPOINT_ENV, PRIVATE_KEY_PATH_ENV, PUBLIC_KEY_PATH_ENV,
};
use crate::crypt::KeyPaths;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Webservice configuration
#[derive(Debug, Clone)]
pub struct WebserviceConfig {
    /// Address the HTTP server listens on
    pub endpoint: SocketAddr,
    /// Location of the key pair used to decrypt SSH secrets
    pub key_paths: KeyPaths,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: AllowedOrigins,
}

impl Default for WebserviceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            key_paths: KeyPaths {
                private_key: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
                public_key: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            },
            allowed_origins: AllowedOrigins::default(),
        }
    }
}

impl WebserviceConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            endpoint: env_var_or_default(ENDPOINT_ENV, default_endpoint()),
            key_paths: KeyPaths {
                private_key: env_var_or_default(
                    PRIVATE_KEY_PATH_ENV,
                    PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
                ),
                public_key: env_var_or_default(
                    PUBLIC_KEY_PATH_ENV,
                    PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
                ),
            },
            allowed_origins: std::env::var(ALLOWED_ORIGINS_ENV)
                .map(|value| AllowedOrigins::parse(&value))
                .unwrap_or_default(),
        }
    }
}

fn default_endpoint() -> SocketAddr {
    DEFAULT_ENDPOINT
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
