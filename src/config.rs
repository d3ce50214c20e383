//! Client configuration for the ScienceDirect API
//!
//! Loading credentials from files or the environment is the caller's
//! concern; this module only carries the values the client needs once they
//! have been obtained.

use std::time::Duration;

use crate::rate_limit::{RequestThrottle, DEFAULT_MIN_INTERVAL};

/// Default base URL for the Elsevier APIs
pub const DEFAULT_BASE_URL: &str = "https://api.elsevier.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`SciDirectClient`](crate::SciDirectClient)
///
/// # Example
///
/// ```
/// use scidirect_client_rs::ClientConfig;
///
/// let config = ClientConfig::new("your_api_key")
///     .with_inst_token("your_institution_token");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: String,
    inst_token: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the given API key and all defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            inst_token: None,
            base_url: None,
            user_agent: None,
            min_interval: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the institutional token sent as `X-ELS-Insttoken`
    pub fn with_inst_token(mut self, inst_token: impl Into<String>) -> Self {
        self.inst_token = Some(inst_token.into());
        self
    }

    /// Override the API base URL (useful for testing against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Override the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the minimum interval enforced between consecutive requests
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = Some(min_interval);
        self
    }

    /// Override the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The configured institutional token, if any
    pub fn inst_token(&self) -> Option<&str> {
        self.inst_token.as_deref()
    }

    /// The configured HTTP request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The base URL requests are issued against
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The User-Agent header value, defaulting to the crate identifier
    pub fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        })
    }

    /// The minimum inter-request interval the throttle enforces
    pub fn effective_min_interval(&self) -> Duration {
        self.min_interval.unwrap_or(DEFAULT_MIN_INTERVAL)
    }

    /// Build the throttle this configuration calls for
    pub fn create_throttle(&self) -> RequestThrottle {
        RequestThrottle::new(self.effective_min_interval())
    }
}
