//! Low-level transport client for the Elsevier ScienceDirect API
//!
//! Single point of contact with the remote API: attaches auth headers,
//! enforces the inter-request throttle, and classifies success/failure.
//! Higher layers ([`SciDirectSearch`](crate::SciDirectSearch),
//! [`SciDirectReference`](crate::SciDirectReference)) share one client and
//! drive it serially.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{Result, SciDirectError};
use crate::rate_limit::RequestThrottle;

const APIKEY_HEADER: &str = "X-ELS-APIKey";
const INSTTOKEN_HEADER: &str = "X-ELS-Insttoken";
const ACCEPT_HEADER: &str = "Accept";

/// Content kinds the article endpoint can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Pdf,
}

impl ContentType {
    /// The Accept header value requested for this kind
    pub fn accept(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Json => write!(f, "json"),
            ContentType::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for ContentType {
    type Err = SciDirectError;

    /// Parse a caller-supplied content kind. Anything other than the two
    /// supported kinds is rejected before any network activity.
    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "json" => Ok(ContentType::Json),
            "pdf" => Ok(ContentType::Pdf),
            other => Err(SciDirectError::InvalidContentType {
                kind: other.to_string(),
            }),
        }
    }
}

/// Status of the most recent request issued by a client
///
/// Overwritten on every call; this is a last-call status, not a history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub status_code: u16,
    pub status_message: String,
}

/// Client for the ScienceDirect search and article endpoints
///
/// Cheap to clone: all clones share the underlying HTTP connection pool,
/// the throttle clock, and the last-outcome slot.
///
/// # Example
///
/// ```no_run
/// use scidirect_client_rs::{ClientConfig, SciDirectClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SciDirectClient::with_config(
///         ClientConfig::new("your_api_key").with_inst_token("your_token"),
///     );
///
///     let url = client.article_url("S0021925821005226");
///     let payload = client.get_json(&url).await?;
///     println!("{}", payload["full-text-retrieval-response"]["coredata"]["prism:doi"]);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SciDirectClient {
    http: reqwest::Client,
    api_key: String,
    inst_token: Option<String>,
    base_url: String,
    throttle: RequestThrottle,
    last_outcome: Arc<Mutex<Option<RequestOutcome>>>,
}

impl SciDirectClient {
    /// Create a client with the given API key and default configuration
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let throttle = config.create_throttle();
        let base_url = config.effective_base_url().to_string();

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.effective_user_agent())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: config.api_key().to_string(),
            inst_token: config.inst_token().map(str::to_string),
            base_url,
            throttle,
            last_outcome: Arc::new(Mutex::new(None)),
        }
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the PUT search endpoint
    pub fn search_url(&self) -> String {
        format!("{}/content/search/sciencedirect", self.base_url)
    }

    /// URL of the per-document article endpoint for the given PII
    pub fn article_url(&self, pii: &str) -> String {
        format!(
            "{}/content/article/pii/{}",
            self.base_url,
            urlencoding::encode(pii)
        )
    }

    /// Status of the most recent request, if any request has been issued
    pub fn last_outcome(&self) -> Option<RequestOutcome> {
        self.last_outcome.lock().unwrap().clone()
    }

    /// Issue a throttled GET expecting a JSON payload
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.exec_get(url, ContentType::Json).await?;
        Ok(response.json().await?)
    }

    /// Issue a throttled GET expecting raw PDF bytes
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_pdf(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.exec_get(url, ContentType::Pdf).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Issue a throttled PUT with a JSON body, returning the JSON payload
    ///
    /// The body shape is the caller's responsibility; this layer does not
    /// validate it.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn put_json(&self, url: &str, body: &Value) -> Result<Value> {
        self.throttle.acquire().await;
        debug!("sending PUT request");

        let headers = self.request_headers(ContentType::Json);
        let mut request = self.http.put(url).json(body);
        for (name, value) in &headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        self.throttle.record_request();

        let response = self.check_status(response, url, &headers).await?;
        self.record_outcome(200, "data retrieved");
        Ok(response.json().await?)
    }

    async fn exec_get(&self, url: &str, content_type: ContentType) -> Result<reqwest::Response> {
        self.throttle.acquire().await;
        debug!(accept = content_type.accept(), "sending GET request");

        let headers = self.request_headers(content_type);
        let mut request = self.http.get(url);
        for (name, value) in &headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        self.throttle.record_request();

        let response = self.check_status(response, url, &headers).await?;
        self.record_outcome(200, &format!("{content_type} data retrieved"));
        Ok(response)
    }

    fn request_headers(&self, content_type: ContentType) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (APIKEY_HEADER, self.api_key.clone()),
            (ACCEPT_HEADER, content_type.accept().to_string()),
        ];
        if let Some(token) = &self.inst_token {
            headers.push((INSTTOKEN_HEADER, token.clone()));
        }
        headers
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<reqwest::Response> {
        let status = response.status().as_u16();
        if status == 200 {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let headers = headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        let error = SciDirectError::ApiError {
            status,
            url: url.to_string(),
            headers,
            body,
        };

        warn!(status, "API request failed");
        self.record_outcome(status, &error.to_string());
        Err(error)
    }

    fn record_outcome(&self, status_code: u16, status_message: &str) {
        *self.last_outcome.lock().unwrap() = Some(RequestOutcome {
            status_code,
            status_message: status_message.to_string(),
        });
    }
}
