//! Browser tests for the `localStorage` backend

#![cfg(target_arch = "wasm32")]

use std::sync::Arc;
use subsmania_frontend_common::storage::LocalStorageStore;
use subsmania_http::client::{CredentialStore, KeyValueStore};
use subsmania_http::types::TokenPair;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn stores_raw_strings_under_fixed_keys() {
    let store = LocalStorageStore::open().unwrap();
    let credentials = CredentialStore::new(Arc::new(store.clone()));
    credentials
        .store_tokens(&TokenPair {
            access_token: "a1".to_string(),
            refresh_token: "r1".to_string(),
        })
        .unwrap();

    assert_eq!(store.get("accessToken").as_deref(), Some("a1"));
    assert_eq!(store.get("refreshToken").as_deref(), Some("r1"));

    credentials.clear().unwrap();
    assert!(store.get("accessToken").is_none());
    assert!(!credentials.has_session());
}
