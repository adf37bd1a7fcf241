//! # Cipher Handle Cache
//!
//! Lazily constructed [`Crypt`] handles, one per encryption context.
//!
//! Loading a key pair means file I/O and parsing a private key, so a handle is
//! created on first use of a context and reused afterwards. Concurrent first
//! access to the same context loads the key files exactly once: each context
//! has its own [`OnceCell`], and the map lock is only held long enough to fetch
//! or insert that cell.
//!
//! A failed load is not cached. The next request for the context tries again,
//! so it keeps failing until the key files are fixed.

use super::{Crypt, KeyLoadError};
use crate::observability;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Locations of the key pair every handle is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

type HandleCell = Arc<OnceCell<Arc<Crypt>>>;

/// Process-wide cache of cipher handles keyed by encryption context
#[derive(Debug)]
pub struct CryptCache {
    key_paths: KeyPaths,
    handles: Mutex<HashMap<String, HandleCell>>,
    loads: AtomicUsize,
}

impl CryptCache {
    pub fn new(key_paths: KeyPaths) -> Self {
        Self {
            key_paths,
            handles: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn key_paths(&self) -> &KeyPaths {
        &self.key_paths
    }

    /// Get the handle for `context`, loading the key pair on first use
    ///
    /// Key files are read and parsed on the blocking thread pool. An entry
    /// whose load fails is dropped, so unknown contexts do not accumulate.
    ///
    /// # Errors
    ///
    /// Returns [`KeyLoadError`] if the key pair cannot be loaded.
    pub async fn get(&self, context: &str) -> Result<Arc<Crypt>, KeyLoadError> {
        let cell = {
            let mut handles = self.lock_handles();
            Arc::clone(handles.entry(context.to_string()).or_default())
        };

        match cell.get_or_try_init(|| self.load(context)).await {
            Ok(crypt) => Ok(Arc::clone(crypt)),
            Err(e) => {
                let mut handles = self.lock_handles();
                if handles
                    .get(context)
                    .is_some_and(|current| Arc::ptr_eq(current, &cell) && !current.initialized())
                {
                    handles.remove(context);
                }
                Err(e)
            }
        }
    }

    /// Number of contexts with a loaded handle
    pub fn loaded_contexts(&self) -> usize {
        self.lock_handles()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// Number of successful key pair loads since the cache was created
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn lock_handles(&self) -> MutexGuard<'_, HashMap<String, HandleCell>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn load(&self, context: &str) -> Result<Arc<Crypt>, KeyLoadError> {
        let KeyPaths {
            private_key,
            public_key,
        } = self.key_paths.clone();
        let owned_context = context.to_string();

        let loaded = tokio::task::spawn_blocking(move || {
            Crypt::from_files(&private_key, &public_key, owned_context)
        })
        .await
        .unwrap_or_else(|e| Err(KeyLoadError::Aborted(e.to_string())));

        match loaded {
            Ok(crypt) => {
                self.loads.fetch_add(1, Ordering::Relaxed);
                observability::metrics::increment_key_loads("success");
                info!(paas = context, "Loaded key pair for Paas");
                Ok(Arc::new(crypt))
            }
            Err(e) => {
                observability::metrics::increment_key_loads("failure");
                error!(paas = context, error = %e, "Failed to load key pair for Paas");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypt::test_support::key_pair;

    fn cache() -> CryptCache {
        let keys = key_pair();
        CryptCache::new(KeyPaths {
            private_key: keys.private_key.clone(),
            public_key: keys.public_key.clone(),
        })
    }

    impl CryptCache {
        fn entry_count(&self) -> usize {
            self.lock_handles().len()
        }
    }

    #[tokio::test]
    async fn test_failed_loads_do_not_accumulate_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CryptCache::new(KeyPaths {
            private_key: dir.path().join("privateKey"),
            public_key: dir.path().join("publicKey"),
        });

        for i in 0..8 {
            cache
                .get(&format!("unknown-{i}"))
                .await
                .expect_err("no key files");
        }
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_loaded_handle_keeps_its_entry() {
        let cache = cache();
        cache.get("paasName").await.expect("load");
        cache.get("otherPaas").await.expect("load");
        assert_eq!(cache.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_same_context_reuses_handle() {
        let cache = cache();
        let first = cache.get("paasName").await.expect("load");
        let second = cache.get("paasName").await.expect("load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
        assert_eq!(first.context(), "paasName");
    }

    #[tokio::test]
    async fn test_each_context_gets_its_own_handle() {
        let cache = cache();
        let a = cache.get("paasA").await.expect("load");
        let b = cache.get("paasB").await.expect("load");

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.context(), "paasA");
        assert_eq!(b.context(), "paasB");
        assert_eq!(cache.loaded_contexts(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_loads_once() {
        let cache = Arc::new(cache());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get("paasName").await })
            })
            .collect();

        let handles: Vec<Arc<Crypt>> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.expect("task").expect("load"))
            .collect();

        assert_eq!(cache.load_count(), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = KeyPaths {
            private_key: dir.path().join("privateKey"),
            public_key: dir.path().join("publicKey"),
        };
        let cache = CryptCache::new(paths.clone());

        let error = cache.get("paasName").await.expect_err("no key files yet");
        assert!(matches!(error, KeyLoadError::Read { .. }));
        assert_eq!(cache.loaded_contexts(), 0);
        assert_eq!(cache.entry_count(), 0);

        std::fs::copy(&key_pair().private_key, &paths.private_key).expect("copy private key");
        std::fs::copy(&key_pair().public_key, &paths.public_key).expect("copy public key");

        let crypt = cache.get("paasName").await.expect("key files are present now");
        assert_eq!(crypt.context(), "paasName");
        assert_eq!(cache.load_count(), 1);
    }
}
