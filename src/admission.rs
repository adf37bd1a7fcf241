//! # Admission
//!
//! Decides whether a Paas is accepted: its name selects the cipher handle, and
//! every SSH secret must decrypt with that handle.

use crate::crd::Paas;
use crate::crypt::{CryptCache, KeyLoadError};
use crate::validation::{self, ValidationError};
use axum::http::StatusCode;
use thiserror::Error;

/// Reason a Paas was not admitted
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("metadata.name is required")]
    MissingName,
    #[error("unable to load key pair: {0}")]
    KeyLoad(#[from] KeyLoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("validation aborted: {0}")]
    Aborted(String),
}

impl AdmissionError {
    /// HTTP status for this rejection
    ///
    /// A Paas that fails validation is a regular answer, not a failed request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdmissionError::MissingName => StatusCode::BAD_REQUEST,
            AdmissionError::Validation(_) => StatusCode::OK,
            AdmissionError::KeyLoad(_) | AdmissionError::Aborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Label for the checks metric
    pub fn result_label(&self) -> &'static str {
        match self {
            AdmissionError::MissingName | AdmissionError::Validation(_) => "rejected",
            AdmissionError::KeyLoad(_) | AdmissionError::Aborted(_) => "error",
        }
    }
}

/// Name of the Paas, if it has a non-empty one
pub fn paas_name(paas: &Paas) -> Option<&str> {
    paas.metadata.name.as_deref().filter(|name| !name.is_empty())
}

/// Admit `paas` if every SSH secret can be decrypted with its handle
///
/// Decryption is CPU bound, so it runs on the blocking thread pool.
///
/// # Errors
///
/// Returns [`AdmissionError`] if the Paas has no name, its key pair cannot be
/// loaded, or any of its SSH secrets cannot be decrypted.
pub async fn admit(crypts: &CryptCache, paas: Paas) -> Result<(), AdmissionError> {
    let name = paas_name(&paas).ok_or(AdmissionError::MissingName)?;
    let crypt = crypts.get(name).await?;

    tokio::task::spawn_blocking(move || validation::check_paas(&crypt, &paas))
        .await
        .map_err(|e| AdmissionError::Aborted(e.to_string()))??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::PaasSpec;
    use crate::crypt::test_support::key_pair;
    use crate::crypt::KeyPaths;
    use std::collections::BTreeMap;

    fn cache() -> CryptCache {
        let keys = key_pair();
        CryptCache::new(KeyPaths {
            private_key: keys.private_key.clone(),
            public_key: keys.public_key.clone(),
        })
    }

    fn paas_with_secret(name: &str, value: &str) -> Paas {
        Paas::new(
            name,
            PaasSpec {
                ssh_secrets: BTreeMap::from([("repo".to_string(), value.to_string())]),
                ..PaasSpec::default()
            },
        )
    }

    #[tokio::test]
    async fn test_admits_decryptable_paas() {
        let crypts = cache();
        let encrypted = crypts
            .get("paasName")
            .await
            .expect("load")
            .encrypt(b"secret")
            .expect("encrypt");

        admit(&crypts, paas_with_secret("paasName", &encrypted))
            .await
            .expect("paas should be admitted");
    }

    #[tokio::test]
    async fn test_rejects_undecryptable_paas() {
        let error = admit(&cache(), paas_with_secret("paasName", "bm90RGVjcnlwdGFibGU="))
            .await
            .expect_err("secret is not a ciphertext");

        assert!(matches!(error, AdmissionError::Validation(_)));
        assert_eq!(error.result_label(), "rejected");
        assert_eq!(error.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_paas_without_name() {
        let mut paas = paas_with_secret("paasName", "irrelevant");
        paas.metadata.name = None;

        let error = admit(&cache(), paas).await.expect_err("name is required");
        assert!(matches!(error, AdmissionError::MissingName));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_when_keys_cannot_be_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let crypts = CryptCache::new(KeyPaths {
            private_key: dir.path().join("privateKey"),
            public_key: dir.path().join("publicKey"),
        });

        let error = admit(&crypts, Paas::new("paasName", PaasSpec::default()))
            .await
            .expect_err("key pair is missing");
        assert!(matches!(error, AdmissionError::KeyLoad(_)));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
