//! Persisted session credentials
//!
//! Tokens live in a durable key-value store under fixed keys, the same layout
//! the browser build keeps in `localStorage`. [`CredentialStore`] is the only
//! handle the client touches; backends implement [`KeyValueStore`].

use crate::types::TokenPair;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use super::MaybeSendSync;

/// Key holding the bearer access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Key holding the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Key holding the cached user profile (JSON)
pub const USER_KEY: &str = "user";

/// Credential backend failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A durable string key-value store
pub trait KeyValueStore: MaybeSendSync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process store; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON file store for native builds.
///
/// The whole map is rewritten through a temporary file on every mutation.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Handle to the persisted session credentials
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_access_token", &self.access_token().is_some())
            .field("has_refresh_token", &self.refresh_token().is_some())
            .finish()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn access_token(&self) -> Option<String> {
        non_empty(self.backend.get(ACCESS_TOKEN_KEY))
    }

    pub fn refresh_token(&self) -> Option<String> {
        non_empty(self.backend.get(REFRESH_TOKEN_KEY))
    }

    /// A session exists while a refresh token is stored
    pub fn has_session(&self) -> bool {
        self.refresh_token().is_some()
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.backend.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.backend.set(REFRESH_TOKEN_KEY, token)
    }

    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.set_access_token(&tokens.access_token)?;
        self.set_refresh_token(&tokens.refresh_token)
    }

    /// Cached profile, if one is stored and still decodes as `T`
    pub fn user_profile<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.backend.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Discarding unreadable cached profile: {e}");
                None
            }
        }
    }

    pub fn set_user_profile<T: Serialize>(&self, profile: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)?;
        self.backend.set(USER_KEY, &raw)
    }

    /// Remove every session key. All removals are attempted; the first error is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let results = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY].map(|key| self.backend.remove(key));
        results.into_iter().collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        role: String,
    }

    #[test]
    fn test_tokens_round_trip_and_clear() {
        let store = CredentialStore::in_memory();
        assert!(!store.has_session());

        store
            .store_tokens(&TokenPair {
                access_token: "access".into(),
                refresh_token: "refresh".into(),
            })
            .unwrap();
        store.set_user_profile(&Profile { name: "kim".into(), role: "USER".into() }).unwrap();

        assert_eq!(store.access_token().as_deref(), Some("access"));
        assert!(store.has_session());

        store.clear().unwrap();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.user_profile::<Profile>().is_none());
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let store = CredentialStore::in_memory();
        store.set_access_token("").unwrap();
        assert!(store.access_token().is_none());
    }

    #[test]
    fn test_unreadable_profile_is_ignored() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(USER_KEY, "{not json").unwrap();
        let store = CredentialStore::new(backend);
        assert!(store.user_profile::<Profile>().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!("subsmania-store-{}.json", uuid::Uuid::new_v4()));
        std::fs::remove_file(&path).ok();

        {
            let store = CredentialStore::new(Arc::new(FileStore::open(&path).unwrap()));
            store.set_access_token("persisted").unwrap();
            store.set_refresh_token("refresh").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("persisted"));

        let store = CredentialStore::new(Arc::new(reopened));
        store.clear().unwrap();
        assert!(FileStore::open(&path).unwrap().get(REFRESH_TOKEN_KEY).is_none());

        std::fs::remove_file(&path).ok();
    }
}
