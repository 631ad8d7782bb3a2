//! Harness configuration.
//!
//! All configuration is passed explicitly: the fixture registry receives a
//! [`HarnessConfig`] value and nothing reads ambient globals at use time.
//! [`HarnessConfig::from_env`] exists only as a convenience constructor for
//! binaries that source the documented environment variables once at start.

use std::path::{Path, PathBuf};

use crate::result::{VitrinaError, VitrinaResult};

/// Environment variable holding the storefront base URL
pub const ENV_WEB_BASE_URL: &str = "VITRINA_WEB_BASE_URL";
/// Environment variable holding the REST API base URL
pub const ENV_API_BASE_URL: &str = "VITRINA_API_BASE_URL";
/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "VITRINA_API_KEY";
/// Environment variable holding the persisted auth state path
pub const ENV_STORAGE_STATE: &str = "VITRINA_STORAGE_STATE";

/// Default location of the persisted auth-state artifact
pub const DEFAULT_STORAGE_STATE_PATH: &str = ".auth/storefront-state.json";

/// Explicit configuration for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the storefront under test
    pub web_base_url: String,
    /// Base URL of the REST API under test
    pub api_base_url: String,
    /// API-key credential sent on every API request
    pub api_key: String,
    /// Path of the persisted auth-state artifact
    pub storage_state_path: PathBuf,
}

impl HarnessConfig {
    /// Create a configuration for the given storefront and API base URLs.
    #[must_use]
    pub fn new(web_base_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            web_base_url: trim_base_url(web_base_url.into()),
            api_base_url: trim_base_url(api_base_url.into()),
            api_key: String::new(),
            storage_state_path: PathBuf::from(DEFAULT_STORAGE_STATE_PATH),
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the persisted auth-state path.
    #[must_use]
    pub fn with_storage_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_state_path = path.into();
        self
    }

    /// Read the configuration from the documented environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`VitrinaError::Config`] naming the first missing variable.
    pub fn from_env() -> VitrinaResult<Self> {
        let web = require_env(ENV_WEB_BASE_URL)?;
        let api = require_env(ENV_API_BASE_URL)?;
        let mut config = Self::new(web, api);
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Ok(path) = std::env::var(ENV_STORAGE_STATE) {
            config.storage_state_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Path of the persisted auth-state artifact.
    #[must_use]
    pub fn storage_state_path(&self) -> &Path {
        &self.storage_state_path
    }
}

fn require_env(name: &str) -> VitrinaResult<String> {
    std::env::var(name).map_err(|_| VitrinaError::Config {
        message: format!("environment variable {name} is not set"),
    })
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
