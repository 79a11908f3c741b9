//! Shared utilities and types used across the SDK.

pub mod downsample;
pub mod types;

pub use downsample::downsample;
pub use types::{
    Asset, QuoteSnapshot, SamplingInterval, Timeframe, DEFAULT_ASSETS, TIMEFRAMES,
};
