//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`SubsClient`](super::SubsClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8080`
    pub base_url: String,

    /// Token renewal endpoint
    pub refresh_path: String,

    /// Server-side logout endpoint
    pub logout_path: String,

    /// Per-request timeout in seconds (ignored in the browser)
    pub request_timeout_secs: u64,

    /// Upper bound on a token renewal, including the refresh call
    pub renewal_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            refresh_path: "/auth/token/refresh".to_string(),
            logout_path: "/auth/logout".to_string(),
            request_timeout_secs: 30,
            renewal_timeout_secs: 10,
            user_agent: concat!("subsmania-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn renewal_timeout(&self) -> Duration {
        Duration::from_secs(self.renewal_timeout_secs)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ClientConfig {
    /// Load configuration from a file, overridden by `SUBSMANIA__*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong type
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, config::ConfigError> {
        let settings = Self::with_defaults()?
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from defaults and `SUBSMANIA__*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable cannot be parsed
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = Self::with_defaults()?
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    fn with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("refresh_path", defaults.refresh_path)?
            .set_default("logout_path", defaults.logout_path)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("renewal_timeout_secs", defaults.renewal_timeout_secs)?
            .set_default("user_agent", defaults.user_agent)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("SUBSMANIA")
            .prefix_separator("__")
            .try_parsing(true)
    }
}
