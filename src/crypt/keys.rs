//! # Key Material
//!
//! Reading and writing PEM encoded RSA keys.
//!
//! Private keys are accepted as PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8
//! (`PRIVATE KEY`), public keys as SPKI (`PUBLIC KEY`) or PKCS#1
//! (`RSA PUBLIC KEY`). Generated keys are written as PKCS#1 private key and
//! SPKI public key.

use super::error::{KeyGenerationError, KeyKind, KeyLoadError};
use crate::constants::MIN_KEY_BITS;
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::path::Path;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Load and parse a PEM encoded RSA private key
///
/// # Errors
///
/// Returns [`KeyLoadError`] if the file cannot be read or holds no RSA
/// private key.
pub fn load_private_key(path: &Path) -> Result<RsaPrivateKey, KeyLoadError> {
    let pem = Zeroizing::new(read_key_file(KeyKind::Private, path)?);

    RsaPrivateKey::from_pkcs1_pem(&pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(&pem))
        .map_err(|_| KeyLoadError::Parse {
            kind: KeyKind::Private,
            path: path.to_path_buf(),
        })
}

/// Load and parse a PEM encoded RSA public key
///
/// # Errors
///
/// Returns [`KeyLoadError`] if the file cannot be read or holds no RSA
/// public key.
pub fn load_public_key(path: &Path) -> Result<RsaPublicKey, KeyLoadError> {
    let pem = read_key_file(KeyKind::Public, path)?;

    RsaPublicKey::from_public_key_pem(&pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(&pem))
        .map_err(|_| KeyLoadError::Parse {
            kind: KeyKind::Public,
            path: path.to_path_buf(),
        })
}

fn read_key_file(kind: KeyKind, path: &Path) -> Result<String, KeyLoadError> {
    debug!(key.kind = %kind, key.path = %path.display(), "Reading key file");
    std::fs::read_to_string(path).map_err(|source| KeyLoadError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Generate a new RSA key pair and write it to the given paths
///
/// The private key file is created with mode 0600 on unix.
///
/// # Errors
///
/// Returns [`KeyGenerationError`] if `bits` is below the minimum, or the keys
/// cannot be generated, encoded or written.
pub fn generate_key_pair(
    private_key_path: &Path,
    public_key_path: &Path,
    bits: usize,
) -> Result<(), KeyGenerationError> {
    if bits < MIN_KEY_BITS {
        return Err(KeyGenerationError::KeyTooSmall {
            bits,
            min: MIN_KEY_BITS,
        });
    }

    let private_key = RsaPrivateKey::new(&mut OsRng, bits)?;
    let public_key = private_key.to_public_key();

    let private_pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| KeyGenerationError::Encode {
            kind: KeyKind::Private,
            message: e.to_string(),
        })?;
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| KeyGenerationError::Encode {
            kind: KeyKind::Public,
            message: e.to_string(),
        })?;

    write_key_file(KeyKind::Private, private_key_path, private_pem.as_bytes())?;
    write_key_file(KeyKind::Public, public_key_path, public_pem.as_bytes())?;

    info!(
        bits,
        private_key = %private_key_path.display(),
        public_key = %public_key_path.display(),
        "Generated RSA key pair"
    );
    Ok(())
}

fn write_key_file(kind: KeyKind, path: &Path, contents: &[u8]) -> Result<(), KeyGenerationError> {
    let to_error = |source| KeyGenerationError::Write {
        kind,
        path: path.to_path_buf(),
        source,
    };

    std::fs::write(path, contents).map_err(to_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if kind == KeyKind::Private {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(to_error)?;
        }
    }

    Ok(())
}
