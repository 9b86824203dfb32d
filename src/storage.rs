use std::collections::HashMap;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicUsize, Ordering},
};

/// The fixed key the auth token lives under. Written by the external login
/// flow, read here. The gateway only ever checks *presence* of this value,
/// never its validity.
pub const TOKEN_STORAGE_KEY: &str = "user_jwt_token";

// 1. TokenStore Contract
/// TokenStore
///
/// Abstract contract for the client-side key-value storage the navigation
/// guard consults. Modeled on the browser local-storage API surface
/// (getItem/setItem/removeItem) and injected as a dependency so the guard is
/// testable without a real storage backend.
///
/// All methods are synchronous: the guard is a pure, non-suspending decision
/// and performs at most one read per navigation attempt.
pub trait TokenStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Removes `key` and its value, if present.
    fn remove(&self, key: &str);
}

// 2. The Real Implementation (In-Process)
/// MemoryTokenStore
///
/// The concrete store used by the running gateway and by integration tests:
/// a RwLock-guarded map, empty at startup. The external login flow (out of
/// scope here) is the writer; the guard is the reader.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor that seeds an auth token under the fixed key.
    /// Primarily used by tests to simulate a logged-in client.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(TOKEN_STORAGE_KEY, token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        // Lock poisoning would mean a writer panicked mid-insert; treat the
        // value as absent rather than propagating the panic into the guard.
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.entries.write() {
            map.remove(key);
        }
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockTokenStore
///
/// A counting wrapper around `MemoryTokenStore` used exclusively in tests.
/// The read counter lets tests prove the guard never consults storage for
/// public routes, which is part of the guard's contract.
#[derive(Default)]
pub struct MockTokenStore {
    inner: MemoryTokenStore,
    reads: AtomicUsize,
}

impl MockTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            inner: MemoryTokenStore::with_token(token),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of `get` calls observed since construction.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TokenStore for MockTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.set(key, value);
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

/// TokenStoreState
///
/// The concrete type used to share the token store across the application state.
pub type TokenStoreState = Arc<dyn TokenStore>;
