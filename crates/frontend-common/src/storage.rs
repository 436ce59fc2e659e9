//! `localStorage` credential backend
//!
//! Values are stored as raw strings so the layout stays readable by anything
//! else on the origin that looks at `accessToken` / `refreshToken` / `user`.

#[cfg(target_arch = "wasm32")]
use subsmania_http::client::{KeyValueStore, StorageError};

#[cfg(target_arch = "wasm32")]
fn js_error(error: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{error:?}"))
}

/// Origin-scoped durable store backed by `window.localStorage`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// Fails when there is no window or the browser has storage disabled
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| js_error(&e))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| js_error(&e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| js_error(&e))
    }
}
