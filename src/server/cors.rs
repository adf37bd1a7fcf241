//! # CORS
//!
//! Builds the CORS layer from the configured allowed origins.

use crate::config::AllowedOrigins;
use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build a CORS layer allowing `origins` to call the API
///
/// # Errors
///
/// Fails if a configured origin is not a valid header value.
pub fn build_cors_layer(origins: &AllowedOrigins) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let layer = match origins {
        AllowedOrigins::Disabled => layer,
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => {
            let values = list
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .with_context(|| format!("Invalid allowed origin '{origin}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            layer.allow_origin(AllowOrigin::list(values))
        }
    };

    Ok(layer)
}
