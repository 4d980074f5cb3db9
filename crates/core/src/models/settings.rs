use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::CoreError;

/// Default location of the remote holdings store.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// Default collection path under the base URL.
pub const DEFAULT_COLLECTION_PATH: &str = "stocks";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the remote holdings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the remote store (e.g., "http://localhost:3001").
    pub api_base_url: String,

    /// Collection path appended to the base URL (e.g., "stocks").
    pub collection_path: String,

    /// Per-request timeout in seconds. `0` disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            collection_path: DEFAULT_COLLECTION_PATH.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `STOCK_DASHBOARD_API_URL`,
    /// `STOCK_DASHBOARD_COLLECTION` and `STOCK_DASHBOARD_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("STOCK_DASHBOARD_API_URL").unwrap_or(defaults.api_base_url),
            collection_path: lookup("STOCK_DASHBOARD_COLLECTION")
                .unwrap_or(defaults.collection_path),
            request_timeout_secs: lookup("STOCK_DASHBOARD_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Check the settings can be used to build a client.
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = Url::parse(&self.api_base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "API base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.collection_segments().next().is_none() {
            return Err(CoreError::Config("collection path must not be empty".into()));
        }
        Ok(())
    }

    /// URL of the whole collection (`{base}/{collection}`).
    pub fn collection_url(&self) -> Result<Url, CoreError> {
        self.validate()?;
        let mut url = Url::parse(&self.api_base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CoreError::Config("API base URL cannot be a base".into()))?;
            segments.pop_if_empty();
            for part in self.collection_segments() {
                segments.push(part);
            }
        }
        Ok(url)
    }

    fn collection_segments(&self) -> impl Iterator<Item = &str> {
        self.collection_path
            .split('/')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
