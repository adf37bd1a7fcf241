//! Shared fixtures for integration tests.

#![allow(dead_code, reason = "not every test binary uses every fixture")]

use paas_webservice::crypt::{generate_key_pair, CryptCache, KeyPaths};
use std::sync::LazyLock;
use tempfile::TempDir;

pub const PAAS_NAME: &str = "paasName";
pub const REPO_NAME: &str = "ssh://git@scm/some-repo.git";
pub const NOT_DECRYPTABLE: &str = "bm90RGVjcnlwdGFibGU=";

pub struct KeyFiles {
    _dir: TempDir,
    pub paths: KeyPaths,
}

/// Key pair generated once per test binary
pub static KEYS: LazyLock<KeyFiles> = LazyLock::new(|| {
    let dir = tempfile::tempdir().expect("create key directory");
    let paths = KeyPaths {
        private_key: dir.path().join("private"),
        public_key: dir.path().join("public"),
    };
    generate_key_pair(&paths.private_key, &paths.public_key, 2048).expect("generate key pair");
    KeyFiles { _dir: dir, paths }
});

pub fn crypt_cache() -> CryptCache {
    CryptCache::new(KEYS.paths.clone())
}
