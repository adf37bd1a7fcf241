//! # Validation
//!
//! Verifies that every encrypted SSH secret of a Paas can be decrypted.
//!
//! The check is all-or-nothing: the top-level `sshSecrets` and the
//! `sshSecrets` of every capability are decrypted, and the first failure
//! rejects the whole Paas. Capabilities are checked whether or not they are
//! enabled, since a disabled capability can be enabled later without its
//! secrets being submitted again.

mod error;

pub use error::{SecretLocation, ValidationError};

use crate::crd::{Paas, SshSecrets};
use crate::crypt::Crypt;
use crate::observability;
use kube::ResourceExt;
use tracing::{debug, warn};

/// Check that `crypt` can decrypt every SSH secret in `paas`
///
/// Top-level secrets are checked first, then capabilities ordered by name.
/// Returns the first failure, tagged with where the secret lives. A Paas
/// without any secrets is valid.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first secret that cannot be
/// decrypted.
pub fn check_paas(crypt: &Crypt, paas: &Paas) -> Result<(), ValidationError> {
    let name = paas.name_any();

    check_secrets(crypt, &paas.spec.ssh_secrets, |key| {
        SecretLocation::TopLevel {
            key: key.to_string(),
        }
    })
    .inspect_err(|e| report_failure(&name, e))?;

    for (capability, record) in &paas.spec.capabilities {
        check_secrets(crypt, &record.ssh_secrets, |key| {
            SecretLocation::Capability {
                capability: capability.clone(),
                key: key.to_string(),
            }
        })
        .inspect_err(|e| report_failure(&name, e))?;
    }

    debug!(
        paas = %name,
        secrets = paas.spec.secret_count(),
        "All SSH secrets of Paas can be decrypted"
    );
    Ok(())
}

fn check_secrets(
    crypt: &Crypt,
    secrets: &SshSecrets,
    location: impl Fn(&str) -> SecretLocation,
) -> Result<(), ValidationError> {
    for (key, encrypted) in secrets {
        crypt
            .decrypt(encrypted)
            .map_err(|source| ValidationError::new(location(key), source))?;
    }
    Ok(())
}

fn report_failure(paas: &str, error: &ValidationError) {
    warn!(
        paas,
        location = %error.location(),
        reason = error.reason(),
        "Paas contains an SSH secret that cannot be decrypted"
    );
    observability::metrics::increment_decryption_failures(
        error.location().kind(),
        error.reason(),
    );
}
