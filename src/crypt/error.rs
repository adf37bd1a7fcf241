//! # Crypt Error Types
//!
//! Errors for loading keys and for encrypting or decrypting secrets.

use std::path::PathBuf;
use thiserror::Error;

/// A private or public key could not be loaded
///
/// Fatal for the cipher handle that needed the key, never for the process.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("unable to read {kind} key file '{}': {source}", path.display())]
    Read {
        kind: KeyKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} key file '{}' does not contain a valid PEM encoded RSA key", path.display())]
    Parse { kind: KeyKind, path: PathBuf },
    #[error(
        "public key '{}' does not belong to private key '{}'",
        public.display(),
        private.display()
    )]
    Mismatch { private: PathBuf, public: PathBuf },
    #[error("loading the key pair was aborted: {0}")]
    Aborted(String),
}

/// Which half of a key pair an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Private,
    Public,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Private => f.write_str("private"),
            KeyKind::Public => f.write_str("public"),
        }
    }
}

/// A ciphertext could not be decrypted with a cipher handle
#[derive(Debug, Error)]
pub enum DecryptionError {
    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("ciphertext is empty")]
    Empty,
    #[error("ciphertext length {length} is not a multiple of the {block_size} byte key size")]
    Length { length: usize, block_size: usize },
    #[error("ciphertext was not encrypted for this key and context")]
    Rsa(#[source] rsa::Error),
}

impl DecryptionError {
    /// Stable label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            DecryptionError::Encoding(_) => "invalid_encoding",
            DecryptionError::Empty => "empty",
            DecryptionError::Length { .. } => "invalid_length",
            DecryptionError::Rsa(_) => "wrong_key",
        }
    }
}

/// A plaintext could not be encrypted
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("{bits} bit key is too small for RSA-OAEP with SHA-512")]
    KeyTooSmall { bits: usize },
    #[error("RSA encryption failed: {0}")]
    Rsa(#[from] rsa::Error),
}

/// A new key pair could not be generated or written
#[derive(Debug, Error)]
pub enum KeyGenerationError {
    #[error("refusing to generate a {bits} bit key, at least {min} bits are required")]
    KeyTooSmall { bits: usize, min: usize },
    #[error("RSA key generation failed: {0}")]
    Rsa(#[from] rsa::Error),
    #[error("unable to PEM encode {kind} key: {message}")]
    Encode { kind: KeyKind, message: String },
    #[error("unable to write {kind} key file '{}': {source}", path.display())]
    Write {
        kind: KeyKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
