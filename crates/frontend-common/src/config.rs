//! Frontend configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Where a dead session sends the user
    pub const LOGIN_PATH: &'static str = "/login";
}
