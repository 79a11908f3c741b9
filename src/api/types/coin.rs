//! Coin metadata types for `GET /coins/{id}`.

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::shared::QuoteSnapshot;

/// Response for `GET /coins/{id}`.
///
/// Only the fields the feed consumes are modeled; everything else in the
/// (large) upstream payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinResponse {
    /// Upstream id, e.g. `bitcoin`
    pub id: String,
    /// Display symbol as reported upstream (usually lowercase)
    pub symbol: String,
    /// Human-readable name
    #[serde(default)]
    pub name: Option<String>,
    /// Market data block; absent for delisted or misconfigured coins
    #[serde(default)]
    pub market_data: Option<MarketData>,
}

/// Market data block of a coin response.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketData {
    /// Current price per quote currency, keyed by currency code
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
    /// Percent change over the last 24 hours
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl CoinResponse {
    /// Validate the response and derive a [`QuoteSnapshot`] from it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DataShape`] when `market_data`, the USD price, or
    /// the 24h change is missing.
    pub fn quote(&self) -> ApiResult<QuoteSnapshot> {
        let market = self.market_data.as_ref().ok_or_else(|| {
            ApiError::DataShape(format!("coin {} response is missing market_data", self.id))
        })?;
        let price_usd = market.current_price.get("usd").copied().ok_or_else(|| {
            ApiError::DataShape(format!(
                "coin {} response is missing market_data.current_price.usd",
                self.id
            ))
        })?;
        let change_percent_24h = market.price_change_percentage_24h.ok_or_else(|| {
            ApiError::DataShape(format!(
                "coin {} response is missing market_data.price_change_percentage_24h",
                self.id
            ))
        })?;
        Ok(QuoteSnapshot {
            symbol: self.symbol.to_uppercase(),
            price_usd,
            change_percent_24h,
        })
    }
}
