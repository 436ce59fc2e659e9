//! Client construction for the browser build

use crate::auth::AuthHandle;
use crate::navigation::LoginRedirect;
use subsmania_http::{ClientConfig, ClientError, CredentialStore, SubsClient};

/// Origin of the current page, when running in a browser
#[cfg(target_arch = "wasm32")]
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn page_origin() -> Option<String> {
    None
}

/// Default client settings, pointed at the page origin when there is one
pub fn default_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Some(origin) = page_origin() {
        config.base_url = origin;
    }
    config
}

/// Credential store for this target.
///
/// `localStorage` in the browser. Falls back to memory when storage is
/// disabled, in which case the session does not survive a reload.
#[cfg(target_arch = "wasm32")]
pub fn credential_store() -> CredentialStore {
    match crate::storage::LocalStorageStore::open() {
        Ok(store) => CredentialStore::new(std::sync::Arc::new(store)),
        Err(e) => {
            warn!("localStorage unavailable, session will not persist: {e}");
            CredentialStore::in_memory()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn credential_store() -> CredentialStore {
    CredentialStore::in_memory()
}

/// Build the application client.
///
/// A dead session marks `auth` logged out and, if the user was signed in,
/// sends them to the login page.
pub fn create_client(config: ClientConfig, auth: &AuthHandle) -> Result<SubsClient, ClientError> {
    SubsClient::builder()
        .config(config)
        .credential_store(credential_store())
        .on_session_end(auth.session_end_hook(LoginRedirect::default()))
        .build()
}
