//! Store configuration

use crate::http::HttpStore;

/// Configuration for connecting to the remote row store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// REST root of the store (e.g. "https://xyz.supabase.co/rest/v1")
    pub base_url: String,

    /// API key, sent as both `apikey` and bearer token
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl StoreConfig {
    /// Create a new configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: 30,
        }
    }

    /// Load configuration from the environment
    ///
    /// `STORE_URL` and `STORE_API_KEY` are required; `STORE_TIMEOUT_SECS`
    /// defaults to 30.
    pub fn from_env() -> Result<Self, String> {
        let base_url =
            std::env::var("STORE_URL").map_err(|_| "STORE_URL is not set".to_string())?;
        let api_key =
            std::env::var("STORE_API_KEY").map_err(|_| "STORE_API_KEY is not set".to_string())?;
        let timeout = std::env::var("STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP store from this configuration
    pub fn build_http_store(&self) -> HttpStore {
        HttpStore::new(self)
    }
}
