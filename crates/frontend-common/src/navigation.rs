//! Login-page redirect on session end

use crate::config::AuthConfig;
use subsmania_http::{SessionEndReason, SessionTerminator};

/// Sends the browser to the login page when the client gives up on a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    login_path: String,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

impl Default for LoginRedirect {
    fn default() -> Self {
        Self::new(AuthConfig::LOGIN_PATH)
    }
}

impl SessionTerminator for LoginRedirect {
    fn terminate(&self, reason: &SessionEndReason) {
        warn!("Session ended ({reason}), redirecting to {}", self.login_path);
        navigate(&self.login_path);
    }
}

#[cfg(target_arch = "wasm32")]
fn navigate(path: &str) {
    let Some(window) = web_sys::window() else {
        error!("No window to navigate to {path}");
        return;
    };
    if let Err(e) = window.location().set_href(path) {
        error!("Failed to navigate to {path}: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn navigate(path: &str) {
    debug!("No browser location to update, skipping navigation to {path}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_login_page() {
        assert_eq!(LoginRedirect::default().login_path(), "/login");
    }

    #[test]
    fn test_terminate_outside_browser_is_noop() {
        let redirect = LoginRedirect::new("/signin");
        redirect.terminate(&SessionEndReason::MissingRefreshToken);
        assert_eq!(redirect.login_path(), "/signin");
    }
}
