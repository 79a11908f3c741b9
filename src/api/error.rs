//! Error types for the REST API client.

use thiserror::Error;

/// Terminal error surfaced by the API client after its retry policy has been
/// exhausted (or for error classes that are never retried).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential rejected by the upstream service (401/403). Never retried.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Repeated 429 responses exhausted the retry budget.
    #[error("rate limit exceeded after {attempts} attempts")]
    RateLimitExhausted {
        /// Total attempts issued, including the first.
        attempts: u32,
    },

    /// Timeout or connection failure that survived the retry budget.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Well-formed HTTP response missing expected fields.
    #[error("invalid response from upstream: {0}")]
    DataShape(String),

    /// The liveness probe failed; no data request was attempted.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Any other HTTP error status. Not retried.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        body: String,
    },

    /// Invalid parameter provided by the caller.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// A single human-readable message for display to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(_) => "Authentication failed. Please check your API key.".to_string(),
            Self::RateLimitExhausted { .. } => {
                "Rate limit exceeded. Please try again in a few minutes.".to_string()
            }
            Self::Transport(err) => {
                format!("Network error while contacting the price service: {err}")
            }
            Self::DataShape(_) => {
                "Received an invalid response from the price service.".to_string()
            }
            Self::UpstreamUnavailable(_) => {
                "The price service appears to be unavailable. Please try again later.".to_string()
            }
            Self::UnexpectedStatus { status, .. } => {
                format!("The price service returned an unexpected error (HTTP {status}).")
            }
            Self::InvalidParameter(msg) => format!("Invalid request: {msg}"),
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error payload format used by the upstream service.
///
/// CoinGecko reports errors either as `{"error": "..."}` or nested as
/// `{"status": {"error_code": ..., "error_message": "..."}}`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorResponse {
    /// Flat error message
    #[serde(default)]
    pub error: Option<String>,
    /// Nested status object
    #[serde(default)]
    pub status: Option<ErrorStatus>,
}

/// Nested error status object.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorStatus {
    /// Upstream error code
    #[serde(default)]
    pub error_code: Option<u32>,
    /// Upstream error message
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ErrorResponse {
    /// Extract the most specific message available.
    pub fn message(&self) -> String {
        self.error
            .clone()
            .or_else(|| {
                self.status
                    .as_ref()
                    .and_then(|s| s.error_message.clone())
            })
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_error_body_message() {
        let body: ErrorResponse = serde_json::from_str(r#"{"error": "coin not found"}"#).unwrap();
        assert_eq!(body.message(), "coin not found");
    }

    #[test]
    fn nested_error_body_message() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"status": {"error_code": 429, "error_message": "You've exceeded the Rate Limit."}}"#,
        )
        .unwrap();
        assert_eq!(body.message(), "You've exceeded the Rate Limit.");
    }

    #[test]
    fn unknown_error_body_falls_back() {
        let body: ErrorResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(body.message(), "unknown error");
    }

    #[test]
    fn user_messages_cover_every_class() {
        let auth = ApiError::Auth("bad key".into());
        assert!(auth.user_message().contains("API key"));

        let limited = ApiError::RateLimitExhausted { attempts: 4 };
        assert!(limited.user_message().contains("Rate limit"));

        let shape = ApiError::DataShape("missing market_data".into());
        assert!(shape.user_message().contains("invalid response"));

        let down = ApiError::UpstreamUnavailable("ping returned 503".into());
        assert!(down.user_message().contains("unavailable"));

        let status = ApiError::UnexpectedStatus {
            status: 500,
            body: "boom".into(),
        };
        assert!(status.user_message().contains("500"));
    }
}
