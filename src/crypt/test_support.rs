//! Shared key pairs for unit tests. Generated once per test binary.

use super::{generate_key_pair, Crypt};
use std::path::PathBuf;
use std::sync::LazyLock;
use tempfile::TempDir;

pub(crate) struct KeyFiles {
    _dir: TempDir,
    pub(crate) private_key: PathBuf,
    pub(crate) public_key: PathBuf,
}

fn generate() -> KeyFiles {
    let dir = tempfile::tempdir().expect("create key directory");
    let private_key = dir.path().join("privateKey");
    let public_key = dir.path().join("publicKey");
    generate_key_pair(&private_key, &public_key, 2048).expect("generate key pair");
    KeyFiles {
        _dir: dir,
        private_key,
        public_key,
    }
}

static KEY_PAIR: LazyLock<KeyFiles> = LazyLock::new(generate);
static OTHER_KEY_PAIR: LazyLock<KeyFiles> = LazyLock::new(generate);

pub(crate) fn key_pair() -> &'static KeyFiles {
    &KEY_PAIR
}

pub(crate) fn other_key_pair() -> &'static KeyFiles {
    &OTHER_KEY_PAIR
}

pub(crate) fn crypt_for(context: &str) -> Crypt {
    let keys = key_pair();
    Crypt::from_files(&keys.private_key, &keys.public_key, context).expect("load key pair")
}
