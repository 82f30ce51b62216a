//! Key-value session storage — the browser `localStorage` analogue.
//!
//! DESIGN
//! ======
//! Three string keys, no namespacing, no expiry. Reads and writes are
//! best-effort with infallible signatures: a storage failure degrades to
//! "key absent" rather than surfacing an error, matching how web storage
//! behaves for the session layer above.
//!
//! Two instances pointed at the same file race with last-write-wins
//! semantics; multi-process coordination is out of scope.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Storage key for the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key for the JSON-serialized user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String key-value store holding the persisted session fields.
pub trait SessionStore: Send + Sync {
    /// Read the value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;
    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
    /// Delete `key` if present.
    fn remove(&self, key: &str);
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Store persisted as a single JSON object at a caller-supplied path.
///
/// The backing file is read once on open and rewritten after every mutation.
/// A missing or unparseable file is treated as an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading any previously persisted entries.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(&raw).ok())
            .unwrap_or_default();
        Self { path, entries: Mutex::new(entries) }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let Ok(raw) = serde_json::to_string(entries) else {
            return;
        };
        if let Err(e) = std::fs::write(&self.path, raw) {
            warn!(error = %e, path = %self.path.display(), "session store write failed");
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}
