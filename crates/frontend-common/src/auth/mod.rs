//! Authentication session state and flows

pub mod service;
pub mod state;

pub use service::AuthService;
pub use state::{AuthAction, AuthHandle, AuthListener, AuthState, SessionEndHook};
