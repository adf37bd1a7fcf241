//! # Request Handlers

use super::ServerState;
use crate::admission::{self, AdmissionError};
use crate::crd::Paas;
use crate::observability;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

/// Result of `/v1/checkpaas`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPaasResponse {
    pub paas: String,
    pub decrypted: bool,
    #[serde(default)]
    pub error: String,
}

/// Body of `/v1/encrypt`
#[derive(Deserialize)]
pub struct EncryptRequest {
    pub paas: String,
    pub secret: String,
}

impl std::fmt::Debug for EncryptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptRequest")
            .field("paas", &self.paas)
            .finish_non_exhaustive()
    }
}

/// Result of `/v1/encrypt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptResponse {
    pub paas: String,
    pub encrypted: String,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// JSON error body for endpoints without a dedicated error field
#[derive(Debug)]
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub(super) async fn healthz() -> &'static str {
    "ok"
}

pub(super) async fn readyz(State(state): State<Arc<ServerState>>) -> (StatusCode, &'static str) {
    if state.is_ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

pub(super) async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub(super) async fn metrics() -> Result<String, ApiError> {
    observability::metrics::gather_metrics().map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: e.to_string(),
    })
}

/// Accept or reject a Paas depending on whether all its SSH secrets decrypt
///
/// Every outcome, including an unreadable body, is answered with a
/// [`CheckPaasResponse`].
pub(super) async fn check_paas(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<CheckPaasResponse>) {
    let started = Instant::now();

    let paas = match body {
        Ok(Json(value)) => {
            let submitted_name = value["metadata"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            match Paas::from_value(value) {
                Ok(paas) => paas,
                Err(e) => return bad_request(submitted_name, format!("invalid Paas: {e}")),
            }
        }
        Err(rejection) => return bad_request(String::new(), rejection.body_text()),
    };
    let name = admission::paas_name(&paas).unwrap_or_default().to_string();

    let result = admission::admit(&state.crypts, paas).await;
    observability::metrics::observe_check_duration(started.elapsed().as_secs_f64());

    match result {
        Ok(()) => {
            observability::metrics::increment_checks("accepted");
            info!(paas = %name, "Paas accepted, all SSH secrets can be decrypted");
            (
                StatusCode::OK,
                Json(CheckPaasResponse {
                    paas: name,
                    decrypted: true,
                    error: String::new(),
                }),
            )
        }
        Err(e) => {
            observability::metrics::increment_checks(e.result_label());
            match &e {
                AdmissionError::KeyLoad(_) | AdmissionError::Aborted(_) => {
                    error!(paas = %name, error = %e, "Unable to check Paas");
                }
                AdmissionError::MissingName | AdmissionError::Validation(_) => {
                    warn!(paas = %name, error = %e, "Paas rejected");
                }
            }
            (
                e.status_code(),
                Json(CheckPaasResponse {
                    paas: name,
                    decrypted: false,
                    error: e.to_string(),
                }),
            )
        }
    }
}

fn bad_request(paas: String, error: String) -> (StatusCode, Json<CheckPaasResponse>) {
    observability::metrics::increment_checks("rejected");
    warn!(paas = %paas, error = %error, "Unable to read Paas from request body");
    (
        StatusCode::BAD_REQUEST,
        Json(CheckPaasResponse {
            paas,
            decrypted: false,
            error,
        }),
    )
}

/// Encrypt a secret for a Paas with the service's public key
pub(super) async fn encrypt(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let EncryptRequest { paas, secret } = request;
    let secret = Zeroizing::new(secret);

    if paas.is_empty() {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "paas is required".to_string(),
        });
    }

    let crypt = state.crypts.get(&paas).await.map_err(|e| {
        observability::metrics::increment_encryptions("error");
        error!(paas = %paas, error = %e, "Unable to load key pair");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    })?;

    let encrypted = crypt.encrypt(secret.as_bytes()).map_err(|e| {
        observability::metrics::increment_encryptions("error");
        error!(paas = %paas, error = %e, "Unable to encrypt secret");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    })?;

    observability::metrics::increment_encryptions("success");
    Ok(Json(EncryptResponse {
        paas,
        encrypted,
        valid: true,
    }))
}
