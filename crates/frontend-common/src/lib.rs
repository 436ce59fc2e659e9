//! Browser-side session glue for the Subs Mania web client
//!
//! Wires [`subsmania_http::SubsClient`] to `localStorage`, the login page and
//! an observable auth state, and carries the small UI-independent pieces the
//! pages share (toasts, logging setup).

#[macro_use]
extern crate tracing;

pub mod auth;
pub mod client;
pub mod config;
pub mod logging;
pub mod navigation;
pub mod storage;
pub mod toast;

pub use auth::{AuthAction, AuthHandle, AuthService, AuthState};
pub use client::{create_client, credential_store};
pub use config::AuthConfig;
pub use navigation::LoginRedirect;
pub use toast::{Toast, ToastId, ToastKind, ToastQueue};
