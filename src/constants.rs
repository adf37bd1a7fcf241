//! # Constants
//!
//! Default values and environment variable names used across the webservice.

/// Environment variable holding the path of the RSA private key
pub const PRIVATE_KEY_PATH_ENV: &str = "PAAS_PRIVATE_KEY_PATH";

/// Environment variable holding the path of the RSA public key
pub const PUBLIC_KEY_PATH_ENV: &str = "PAAS_PUBLIC_KEY_PATH";

/// Environment variable holding the listen address of the HTTP server
pub const ENDPOINT_ENV: &str = "PAAS_ENDPOINT";

/// Environment variable holding the comma-separated list of allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "PAAS_WS_ALLOWED_ORIGINS";

/// Default location of the private key (mounted from a Kubernetes secret)
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "/secrets/paas/privateKey";

/// Default location of the public key (mounted from a Kubernetes secret)
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "/secrets/paas/publicKey";

/// Default listen address of the HTTP server
pub const DEFAULT_ENDPOINT: &str = "0.0.0.0:8080";

/// Default tracing filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "paas_webservice=info";

/// Key size used by `paasctl generate` when none is given
pub const DEFAULT_KEY_BITS: usize = 4096;

/// Smallest key size accepted when generating a key pair
pub const MIN_KEY_BITS: usize = 2048;

/// Upper bound for request bodies read in the HTTP layer
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;
