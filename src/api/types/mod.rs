//! API response types for the upstream REST service, organized by endpoint.

pub mod coin;
pub mod market_chart;

pub use coin::{CoinResponse, MarketData};
pub use market_chart::{MarketChartResponse, PricePoint};
