//! Live price feed: acquisition orchestration and the refresh controller.
//!
//! The feed layer turns the low-level [`crate::api`] client into observable
//! state. [`PriceFeed`] owns a controller task that reacts to asset and
//! timeframe commands, debounces rapid changes, runs at most one committed
//! refresh per settled selection, and publishes [`FeedState`] through a
//! `tokio::sync::watch` channel.

pub mod controller;
pub mod orchestrator;
pub mod state;

pub use controller::{FeedConfig, PriceFeed};
pub use orchestrator::{fetch_snapshot, MarketSnapshot, DEFAULT_INTER_CALL_SPACING};
pub use state::{FeedState, FeedStatus};
