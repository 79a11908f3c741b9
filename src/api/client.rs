//! REST API client implementation.
//!
//! [`CoinGeckoClient`] wraps every request with a per-attempt timeout and a
//! bounded exponential backoff policy. Rate-limit responses honor the
//! server-supplied `Retry-After` delay when present; credential rejections
//! are never retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinfeed::api::CoinGeckoClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinGeckoClient::builder(coinfeed::network::DEFAULT_API_URL)
//!         .api_key(std::env::var("COINGECKO_API_KEY")?)
//!         .build()?;
//!
//!     client.ping().await?;
//!     let coin = client.coin("bitcoin").await?;
//!     println!("BTC = {} USD", coin.quote()?.price_usd);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::api::types::{CoinResponse, MarketChartResponse};
use crate::network::API_KEY_HEADER;
use crate::shared::SamplingInterval;

/// Default per-attempt request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Retry configuration for the API client.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (0 = disabled)
    pub max_retries: u32,
    /// Delay before the first retry (ms); doubles after each failure
    pub base_delay_ms: u64,
    /// Upper bound on any single backoff delay (ms)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            max_delay_ms: 60_000,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with the given max retries.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the base delay in milliseconds.
    pub fn with_base_delay_ms(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    /// Set the maximum delay in milliseconds.
    pub fn with_max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Backoff delay before the retry with the given zero-based index.
    ///
    /// The schedule is deterministic: `base_delay_ms * 2^retry`, capped at
    /// `max_delay_ms`. No jitter is applied, so retry timing is exactly
    /// reproducible in tests.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exp_delay = self.base_delay_ms.saturating_mul(1u64 << retry.min(16));
        Duration::from_millis(exp_delay.min(self.max_delay_ms))
    }
}

/// Builder for configuring [`CoinGeckoClient`].
#[derive(Debug, Clone)]
pub struct CoinGeckoClientBuilder {
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    default_headers: Vec<(String, String)>,
    retry_config: RetryConfig,
}

impl CoinGeckoClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key: None,
            default_headers: Vec::new(),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the static API credential, sent as the `x-cg-demo-api-key`
    /// header on every attempt.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Configure the retry/backoff policy.
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a header value is malformed or the underlying
    /// HTTP client cannot be initialized.
    pub fn build(self) -> ApiResult<CoinGeckoClient> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &self.api_key {
            let value = reqwest::header::HeaderValue::from_str(key).map_err(|e| {
                ApiError::InvalidParameter(format!("invalid API key value: {e}"))
            })?;
            headers.insert(API_KEY_HEADER, value);
        }
        for (name, value) in self.default_headers {
            let header_name =
                reqwest::header::HeaderName::try_from(name.as_str()).map_err(|e| {
                    ApiError::InvalidParameter(format!("invalid header name '{name}': {e}"))
                })?;
            let header_value = reqwest::header::HeaderValue::from_str(&value).map_err(|e| {
                ApiError::InvalidParameter(format!("invalid header value for '{name}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(10)
            .default_headers(headers)
            .build()?;

        Ok(CoinGeckoClient {
            http_client,
            base_url: self.base_url,
            retry_config: self.retry_config,
        })
    }
}

/// REST API client for a CoinGecko-compatible service.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http_client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl CoinGeckoClient {
    /// Create a new client with the given base URL and default settings
    /// (10 s per-attempt timeout, 3 retries starting at 2 s).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        CoinGeckoClientBuilder::new(base_url).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(base_url: impl Into<String>) -> CoinGeckoClientBuilder {
        CoinGeckoClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Execute a GET request through the retry policy and deserialize the
    /// response body.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self.execute_with_retry(url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DataShape(format!("failed to deserialize response: {e}")))
    }

    /// Issue a GET request, retrying transient failures with exponential
    /// backoff.
    ///
    /// Classification per attempt:
    /// - 2xx: done
    /// - 401/403: [`ApiError::Auth`], never retried
    /// - 429: wait the server's `Retry-After` if present, else the current
    ///   backoff delay; the exponential state advances either way
    /// - timeout / connection failure: wait the current backoff delay
    /// - any other status: [`ApiError::UnexpectedStatus`], no retry
    async fn execute_with_retry(&self, url: &str) -> ApiResult<reqwest::Response> {
        let max_retries = self.retry_config.max_retries;
        let mut retry: u32 = 0;

        loop {
            match self.http_client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        tracing::debug!(%status, url, attempt = retry + 1, "request succeeded");
                        return Ok(response);
                    }

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        let body = Self::error_body(response).await;
                        tracing::warn!(%status, url, "credential rejected");
                        return Err(ApiError::Auth(body));
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if retry >= max_retries {
                            tracing::warn!(
                                url,
                                attempts = retry + 1,
                                "rate limit retry budget exhausted"
                            );
                            return Err(ApiError::RateLimitExhausted {
                                attempts: retry + 1,
                            });
                        }
                        let delay = retry_after(response.headers())
                            .unwrap_or_else(|| self.retry_config.delay_for_retry(retry));
                        tracing::debug!(
                            url,
                            attempt = retry + 1,
                            max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "rate limited, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        retry += 1;
                        continue;
                    }

                    let body = Self::error_body(response).await;
                    tracing::warn!(%status, url, body = %body, "request failed with non-retryable status");
                    return Err(ApiError::UnexpectedStatus {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) => {
                    let is_transient = e.is_connect() || e.is_timeout() || e.is_request();
                    if !is_transient || retry >= max_retries {
                        tracing::warn!(url, error = %e, attempts = retry + 1, "network failure is terminal");
                        return Err(ApiError::Transport(e));
                    }
                    let delay = self.retry_config.delay_for_retry(retry);
                    tracing::debug!(
                        url,
                        attempt = retry + 1,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "network failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }

    /// Pull the most specific error message out of a failed response body.
    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.message())
                .unwrap_or(text),
            Err(e) => format!("HTTP {status} (body unreadable: {e})"),
        }
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Liveness probe: `GET /ping`.
    ///
    /// Issues a single attempt; a probe against a possibly-down service
    /// must not burn the retry budget. Any 2xx means available.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UpstreamUnavailable`] for any failure.
    pub async fn ping(&self) -> ApiResult<()> {
        let url = format!("{}/ping", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, "liveness probe succeeded");
            Ok(())
        } else {
            Err(ApiError::UpstreamUnavailable(format!(
                "ping returned HTTP {status}"
            )))
        }
    }

    /// Fetch coin metadata: `GET /coins/{id}`.
    ///
    /// Localization, tickers, community and developer data, and the
    /// sparkline are disabled to keep the payload small.
    pub async fn coin(&self, id: &str) -> ApiResult<CoinResponse> {
        if id.is_empty() {
            return Err(ApiError::InvalidParameter("coin id cannot be empty".into()));
        }
        let url = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false",
            self.base_url,
            urlencoding::encode(id)
        );
        self.get(&url).await
    }

    /// Fetch the price time series:
    /// `GET /coins/{id}/market_chart?vs_currency=usd&days={days}&interval={interval}`.
    pub async fn market_chart(
        &self,
        id: &str,
        days: u32,
        interval: SamplingInterval,
    ) -> ApiResult<MarketChartResponse> {
        if id.is_empty() {
            return Err(ApiError::InvalidParameter("coin id cannot be empty".into()));
        }
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}&interval={}",
            self.base_url,
            urlencoding::encode(id),
            days,
            interval.as_str()
        );
        self.get(&url).await
    }
}

/// Parse a server-supplied `Retry-After` header (whole seconds).
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
