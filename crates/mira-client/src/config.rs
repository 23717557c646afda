//! Client configuration.

use std::env;
use std::fmt;

use tracing::debug;

use crate::error::{ClientError, Result};

/// Base URL of the hosted console service
pub const DEFAULT_BASE_URL: &str = "https://console-bff.arohalabs.tech";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "MIRA_BASE_URL";

/// Settings shared by the blocking and async consoles
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Static API key sent with every request
    pub api_key: String,
    /// Base URL every request path is joined to
    pub base_url: String,
}

impl ClientConfig {
    /// Configuration for the hosted service with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another server
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load configuration from the environment.
    ///
    /// A `.env` file in the working directory (or a parent) is read first if
    /// one exists. `API_KEY` is required; `MIRA_BASE_URL` is optional.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded environment file");
        }
        Self::from_vars(env::var(API_KEY_ENV).ok(), env::var(BASE_URL_ENV).ok())
    }

    fn from_vars(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClientError::Config(format!("{} not found in environment variables", API_KEY_ENV)))?;

        let config = ClientConfig::new(api_key);
        Ok(match base_url.filter(|url| !url.is_empty()) {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }

    /// Check that the base URL is usable
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Join a request path to the base URL
    pub(crate) fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
