//! REST API client module.
//!
//! This module provides a typed HTTP client for a CoinGecko-compatible REST
//! API, with per-attempt timeouts and bounded exponential backoff.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use coinfeed::api::CoinGeckoClient;
//! use coinfeed::network::DEFAULT_API_URL;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinGeckoClient::builder(DEFAULT_API_URL)
//!         .api_key("CG-...")
//!         .build()?;
//!
//!     let coin = client.coin("ethereum").await?;
//!     let quote = coin.quote()?;
//!     println!("{}: {} USD ({:+.2}% 24h)", quote.symbol, quote.price_usd, quote.change_percent_24h);
//!     Ok(())
//! }
//! ```
//!
//! # Error handling
//!
//! All methods return [`ApiResult<T>`], an alias for `Result<T, ApiError>`.
//! The client resolves transient failures internally (retry with backoff);
//! an `Err` is always terminal for the request:
//!
//! ```rust,ignore
//! match client.coin("bitcoin").await {
//!     Ok(coin) => println!("ok"),
//!     Err(ApiError::Auth(msg)) => eprintln!("check the API key: {msg}"),
//!     Err(ApiError::RateLimitExhausted { attempts }) => eprintln!("gave up after {attempts} attempts"),
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{CoinGeckoClient, CoinGeckoClientBuilder, RetryConfig};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use types::*;
