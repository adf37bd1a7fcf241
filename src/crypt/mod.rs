//! # Crypt
//!
//! RSA cipher handles for SSH secrets.
//!
//! A [`Crypt`] owns a loaded key pair and an encryption context. The context is
//! the name of the Paas a secret belongs to and is used as the RSA-OAEP label,
//! so a secret encrypted for one Paas cannot be decrypted for another.
//!
//! ## Ciphertext format
//!
//! The plaintext is split into chunks that fit a single RSA-OAEP (SHA-512)
//! block. Each chunk is encrypted separately, the blocks are concatenated and
//! the result is base64 encoded (standard alphabet, padded). Every block is
//! exactly as long as the key modulus.

pub mod cache;
pub mod error;
pub mod keys;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CryptCache, KeyPaths};
pub use error::{DecryptionError, EncryptionError, KeyGenerationError, KeyKind, KeyLoadError};
pub use keys::{generate_key_pair, load_private_key, load_public_key};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha512};
use std::path::Path;
use zeroize::Zeroizing;

/// Cipher handle for one encryption context
///
/// Immutable after construction. Encryption and decryption do not touch shared
/// state, so a handle can be used from many threads at once.
pub struct Crypt {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
    context: String,
}

impl std::fmt::Debug for Crypt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crypt")
            .field("context", &self.context)
            .field("key_bits", &(self.public_key.size() * 8))
            .finish_non_exhaustive()
    }
}

impl Crypt {
    /// Create a handle from already parsed keys
    pub fn new(
        private_key: RsaPrivateKey,
        public_key: RsaPublicKey,
        context: impl Into<String>,
    ) -> Self {
        Self {
            private_key,
            public_key,
            context: context.into(),
        }
    }

    /// Load both halves of the key pair and create a handle for `context`
    ///
    /// # Errors
    ///
    /// Returns [`KeyLoadError`] if either file is missing or unparsable, or if
    /// the public key does not belong to the private key.
    pub fn from_files(
        private_key_path: &Path,
        public_key_path: &Path,
        context: impl Into<String>,
    ) -> Result<Self, KeyLoadError> {
        let private_key = load_private_key(private_key_path)?;
        let public_key = load_public_key(public_key_path)?;

        if private_key.to_public_key() != public_key {
            return Err(KeyLoadError::Mismatch {
                private: private_key_path.to_path_buf(),
                public: public_key_path.to_path_buf(),
            });
        }

        Ok(Self::new(private_key, public_key, context))
    }

    /// Encryption context (the Paas name) this handle was created for
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Encrypt `plaintext` and return the base64 encoded ciphertext
    ///
    /// # Errors
    ///
    /// Returns [`EncryptionError`] if the key is too small for OAEP with
    /// SHA-512 or RSA encryption fails.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, EncryptionError> {
        encrypt_for(&self.public_key, &self.context, plaintext)
    }

    /// Decrypt a base64 encoded ciphertext
    ///
    /// Every block must decrypt under this handle's key and context. A value
    /// that merely happens to be valid base64 is rejected, and so is
    /// surrounding whitespace. Ciphertexts come from untrusted callers, so the
    /// private key operation is blinded.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionError`] if the value is not padded standard base64,
    /// is empty, is not a whole number of key-sized blocks, or a block fails
    /// OAEP decryption.
    pub fn decrypt(&self, ciphertext: &str) -> Result<Zeroizing<Vec<u8>>, DecryptionError> {
        let encrypted = STANDARD.decode(ciphertext)?;
        if encrypted.is_empty() {
            return Err(DecryptionError::Empty);
        }

        let block_size = self.private_key.size();
        if encrypted.len() % block_size != 0 {
            return Err(DecryptionError::Length {
                length: encrypted.len(),
                block_size,
            });
        }

        let mut plaintext = Zeroizing::new(Vec::with_capacity(encrypted.len()));
        for block in encrypted.chunks(block_size) {
            let chunk = Zeroizing::new(
                self.private_key
                    .decrypt_blinded(&mut OsRng, oaep(&self.context), block)
                    .map_err(DecryptionError::Rsa)?,
            );
            plaintext.extend_from_slice(&chunk);
        }

        Ok(plaintext)
    }
}

/// Encrypt `plaintext` for `context` using only a public key
///
/// Used where the private key is not available, e.g. on a developer machine.
///
/// # Errors
///
/// Same as [`Crypt::encrypt`].
pub fn encrypt_for(
    public_key: &RsaPublicKey,
    context: &str,
    plaintext: &[u8],
) -> Result<String, EncryptionError> {
    let chunk_size = max_chunk_size(public_key)?;

    let blocks = plaintext.len().div_ceil(chunk_size).max(1);
    let mut encrypted = Vec::with_capacity(blocks * public_key.size());
    if plaintext.is_empty() {
        encrypted.extend(public_key.encrypt(&mut OsRng, oaep(context), plaintext)?);
    }
    for chunk in plaintext.chunks(chunk_size) {
        encrypted.extend(public_key.encrypt(&mut OsRng, oaep(context), chunk)?);
    }

    Ok(STANDARD.encode(encrypted))
}

fn oaep(context: &str) -> Oaep {
    Oaep::new_with_label::<Sha512, _>(context)
}

/// Largest plaintext that fits one OAEP block: k - 2*hLen - 2
fn max_chunk_size(public_key: &RsaPublicKey) -> Result<usize, EncryptionError> {
    let overhead = 2 * <Sha512 as Digest>::output_size() + 2;
    match public_key.size().checked_sub(overhead) {
        Some(size) if size > 0 => Ok(size),
        _ => Err(EncryptionError::KeyTooSmall {
            bits: public_key.size() * 8,
        }),
    }
}
