//! SlotDesk API client
//!
//! Async client for the plan and record endpoints of the SlotDesk platform
//! API. [`Client`] implements the gate's [`PlanService`] and [`RecordStore`]
//! ports, so the console adapters run unchanged against the live API.
//!
//! # Example
//!
//! ```rust,no_run
//! use slotdesk_client::{Client, ClientConfig};
//! use slotdesk_core::{PlanService, ResourceType, TenantContext};
//!
//! # async fn run() -> slotdesk_client::Result<()> {
//! let client = Client::with_config(ClientConfig {
//!     api_key: "sd_live_abc123".into(),
//!     ..Default::default()
//! })?;
//!
//! let tenant = TenantContext::new("seller-42");
//! let plan = client.entitlement(&tenant, ResourceType::Customers).await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

pub use error::Error;
use error::ErrorResponse;

pub mod error;
pub mod services;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.slotdesk.io/v1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default max retries
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// HTTP Client
// =============================================================================

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// SlotDesk API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    base: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig {
            api_key: api_key.into(),
            ..Default::default()
        })
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if !config.api_key.is_empty() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                    .map_err(|_| Error::Config("API key contains invalid header characters".into()))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("slotdesk-rust/{}", VERSION))
                .map_err(|_| Error::Config("invalid user agent".into()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        // Trailing slash so relative joins keep the version prefix
        let base = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))?;

        Ok(Self {
            inner: Arc::new(ClientInner { config, base, http }),
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the plans service
    pub fn plans(&self) -> services::PlansService {
        services::PlansService::new(self.clone())
    }

    /// Get the records service
    pub fn resources(&self) -> services::RecordsService {
        services::RecordsService::new(self.clone())
    }

    /// Make a GET request
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut url = self.inner.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        self.request(reqwest::Method::GET, url).await
    }

    async fn request<T: DeserializeOwned>(&self, method: reqwest::Method, url: Url) -> Result<T> {
        let config = &self.inner.config;
        let mut attempt = 0;

        loop {
            let request_id = uuid::Uuid::new_v4().to_string();
            tracing::debug!(%method, %url, %request_id, attempt, "api request");

            let error = match self.send_once(method.clone(), url.clone(), &request_id).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() || attempt >= config.max_retries {
                return Err(error);
            }

            let wait = match &error {
                Error::RateLimit { retry_after, .. } => Duration::from_secs(*retry_after),
                _ => config.retry_delay * (1 << attempt),
            };
            tracing::warn!(%url, %request_id, attempt, error = %error, ?wait, "retrying api request");
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: Url,
        request_id: &str,
    ) -> Result<T> {
        let response = self
            .inner
            .http
            .request(method, url)
            .header("X-Request-ID", request_id)
            .send()
            .await?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("X-Request-ID")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .or_else(|| Some(request_id.to_string()));

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(30);

            return Err(Error::RateLimit {
                retry_after,
                request_id,
            });
        }

        let body_bytes = response.bytes().await?;

        if status.is_success() {
            #[derive(Deserialize)]
            struct ApiResponse<T> {
                data: Option<T>,
            }

            // Try to parse with data wrapper first
            if let Ok(resp) = serde_json::from_slice::<ApiResponse<T>>(&body_bytes) {
                if let Some(data) = resp.data {
                    return Ok(data);
                }
            }

            // Fall back to parsing directly
            return Ok(serde_json::from_slice(&body_bytes)?);
        }

        let error = match serde_json::from_slice::<ErrorResponse>(&body_bytes) {
            Ok(err_resp) => Error::Api {
                code: err_resp.error.code,
                message: err_resp.error.message,
                status_code: status.as_u16(),
                request_id,
            },
            Err(_) => Error::Api {
                code: "unknown_error".to_string(),
                message: String::from_utf8_lossy(&body_bytes).to_string(),
                status_code: status.as_u16(),
                request_id,
            },
        };

        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = Client::new("test_api_key").unwrap();
        assert_eq!(client.config().api_key, "test_api_key");
        assert_eq!(client.inner.base.as_str(), "https://api.slotdesk.io/v1/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Client::with_config(ClientConfig {
            base_url: "not a url".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Url(_))));
    }

    #[test]
    fn test_retryable_classification() {
        let server_error = Error::Api {
            code: "internal".into(),
            message: "boom".into(),
            status_code: 503,
            request_id: None,
        };
        let not_found = Error::Api {
            code: "not_found".into(),
            message: "gone".into(),
            status_code: 404,
            request_id: None,
        };

        assert!(server_error.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(not_found.is_not_found_error());
        assert!(Error::RateLimit { retry_after: 1, request_id: None }.is_retryable());
    }
}
