//! Market chart types for `GET /coins/{id}/market_chart`.

use serde::{Deserialize, Serialize};

/// One raw chart sample, serialized upstream as a `[timestamp_ms, price]`
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub i64, pub f64);

impl PricePoint {
    /// Sample timestamp in milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    /// Price in the requested quote currency.
    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Response for `GET /coins/{id}/market_chart`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    /// Chronological price samples
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

impl MarketChartResponse {
    /// Drop the timestamps and keep the price component of each sample.
    pub fn price_series(&self) -> Vec<f64> {
        self.prices.iter().map(PricePoint::price).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_response_deserializes_pairs() {
        let json = r#"{
            "prices": [
                [1704067200000, 42000.5],
                [1704153600000, 42750.0],
                [1704240000000, 41900.25]
            ]
        }"#;
        let response: MarketChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.prices.len(), 3);
        assert_eq!(response.prices[0].timestamp_ms(), 1704067200000);
        assert_eq!(
            response.price_series(),
            vec![42000.5, 42750.0, 41900.25]
        );
    }

    #[test]
    fn missing_prices_defaults_to_empty() {
        let response: MarketChartResponse = serde_json::from_str("{}").unwrap();
        assert!(response.prices.is_empty());
        assert!(response.price_series().is_empty());
    }
}
