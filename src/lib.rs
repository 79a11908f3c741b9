//! # coinfeed
//!
//! A resilient market-data pipeline for CoinGecko-compatible REST APIs.
//!
//! ## Modules
//!
//! - [`api`]: typed REST client with timeout, retry, and backoff policy
//! - [`feed`]: acquisition orchestrator and the debounced refresh controller
//! - [`shared`]: assets, timeframes, quotes, and the series downsampler
//! - [`network`]: default endpoint constants
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use coinfeed::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinGeckoClient::builder(DEFAULT_API_URL)
//!         .api_key(std::env::var("COINGECKO_API_KEY")?)
//!         .build()?;
//!
//!     let feed = PriceFeed::spawn(client, FeedConfig::default());
//!     let mut state = feed.state();
//!
//!     feed.set_asset(Asset::new("ETH", "ethereum")).await;
//!     while state.changed().await.is_ok() {
//!         let snapshot = state.borrow().clone();
//!         if let Some(quote) = &snapshot.quote {
//!             println!(
//!                 "{}: {} USD ({:+.2}%), {} points",
//!                 quote.symbol,
//!                 quote.price_usd,
//!                 quote.change_percent_24h,
//!                 snapshot.series.len()
//!             );
//!         }
//!     }
//!     Ok(())
//! }
//! ```

/// Typed REST API client with retry/backoff policy.
pub mod api;

/// Acquisition orchestrator and refresh controller.
pub mod feed;

/// Network endpoint constants.
pub mod network;

/// Shared types and utilities used across the SDK.
pub mod shared;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use coinfeed::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ApiError, ApiResult, CoinGeckoClient, CoinGeckoClientBuilder, CoinResponse,
        MarketChartResponse, PricePoint, RetryConfig,
    };
    pub use crate::feed::{
        fetch_snapshot, FeedConfig, FeedState, FeedStatus, MarketSnapshot, PriceFeed,
        DEFAULT_INTER_CALL_SPACING,
    };
    pub use crate::network::{API_KEY_HEADER, DEFAULT_API_URL};
    pub use crate::shared::{
        downsample, Asset, QuoteSnapshot, SamplingInterval, Timeframe, DEFAULT_ASSETS, TIMEFRAMES,
    };
}
