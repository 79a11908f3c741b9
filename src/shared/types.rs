//! Shared type definitions for the coinfeed SDK.
//!
//! This module contains types that are used by both the REST API client and
//! the feed controller.

use serde::{Deserialize, Serialize};

// ============================================================================
// Asset
// ============================================================================

/// Well-known assets shown by default, as `(display symbol, upstream id)`.
pub const DEFAULT_ASSETS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("BNB", "binancecoin"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("AVAX", "avalanche-2"),
    ("USDT", "tether"),
];

/// A tracked instrument: a display symbol plus the upstream lookup id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Display symbol (uppercased), e.g. `BTC`.
    pub symbol: String,
    /// Upstream lookup id (lowercased), e.g. `bitcoin`.
    pub id: String,
}

impl Asset {
    /// Create an asset from free-form input.
    ///
    /// The symbol is uppercased and the id lowercased; no validation against
    /// a real registry is performed.
    pub fn new(symbol: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            id: id.into().trim().to_lowercase(),
        }
    }

    /// The built-in catalog of well-known assets.
    pub fn builtin() -> Vec<Self> {
        DEFAULT_ASSETS
            .iter()
            .map(|(symbol, id)| Self::new(*symbol, *id))
            .collect()
    }
}

impl Default for Asset {
    fn default() -> Self {
        Self::new("BTC", "bitcoin")
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

// ============================================================================
// SamplingInterval
// ============================================================================

/// Chart sampling granularity requested from the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingInterval {
    /// One sample per minute
    #[serde(rename = "minutely")]
    Minutely,
    /// One sample per hour
    #[serde(rename = "hourly")]
    Hourly,
    /// One sample per day
    #[default]
    #[serde(rename = "daily")]
    Daily,
}

impl SamplingInterval {
    /// Get the query-parameter representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minutely => "minutely",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

impl std::fmt::Display for SamplingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Timeframe
// ============================================================================

/// A named chart window: days of history, sampling granularity, and the
/// number of points the display should be reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    /// Short display label, e.g. `1M`.
    pub label: &'static str,
    /// Days of history to request.
    pub days: u32,
    /// Sampling granularity of the raw series.
    pub interval: SamplingInterval,
    /// Target display point count for downsampling.
    pub target_points: usize,
}

/// The fixed, ordered timeframe catalog.
pub const TIMEFRAMES: &[Timeframe] = &[
    Timeframe {
        label: "24H",
        days: 1,
        interval: SamplingInterval::Hourly,
        target_points: 24,
    },
    Timeframe {
        label: "1W",
        days: 7,
        interval: SamplingInterval::Daily,
        target_points: 7,
    },
    Timeframe {
        label: "1M",
        days: 30,
        interval: SamplingInterval::Daily,
        target_points: 30,
    },
    Timeframe {
        label: "6M",
        days: 180,
        interval: SamplingInterval::Daily,
        target_points: 180,
    },
    Timeframe {
        label: "1Y",
        days: 365,
        interval: SamplingInterval::Daily,
        target_points: 365,
    },
    Timeframe {
        label: "5Y",
        days: 1825,
        interval: SamplingInterval::Daily,
        target_points: 1825,
    },
];

impl Timeframe {
    /// Look up a catalog entry by its display label.
    pub fn by_label(label: &str) -> Option<Self> {
        TIMEFRAMES.iter().find(|tf| tf.label == label).copied()
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        // 1M is the initial selection
        TIMEFRAMES[2]
    }
}

// ============================================================================
// QuoteSnapshot
// ============================================================================

/// The validated result of a coin metadata call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Uppercased display symbol reported by the upstream service.
    pub symbol: String,
    /// Current price in USD.
    pub price_usd: f64,
    /// Percent change over the last 24 hours.
    pub change_percent_24h: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_input_is_normalized() {
        let asset = Asset::new("  sol ", " Solana ");
        assert_eq!(asset.symbol, "SOL");
        assert_eq!(asset.id, "solana");
    }

    #[test]
    fn builtin_catalog_is_complete_and_normalized() {
        let assets = Asset::builtin();
        assert_eq!(assets.len(), DEFAULT_ASSETS.len());
        assert!(assets.iter().all(|a| a.symbol == a.symbol.to_uppercase()));
        assert!(assets.iter().all(|a| a.id == a.id.to_lowercase()));
        assert_eq!(assets[0], Asset::default());
    }

    #[test]
    fn timeframe_catalog_lookup() {
        let tf = Timeframe::by_label("1W").unwrap();
        assert_eq!(tf.days, 7);
        assert_eq!(tf.interval, SamplingInterval::Daily);
        assert_eq!(tf.target_points, 7);
        assert!(Timeframe::by_label("3D").is_none());
    }

    #[test]
    fn default_timeframe_is_one_month() {
        let tf = Timeframe::default();
        assert_eq!(tf.label, "1M");
        assert_eq!(tf.days, 30);
    }

    #[test]
    fn sampling_interval_query_values() {
        assert_eq!(SamplingInterval::Minutely.as_str(), "minutely");
        assert_eq!(SamplingInterval::Hourly.as_str(), "hourly");
        assert_eq!(SamplingInterval::Daily.as_str(), "daily");
        assert_eq!(
            serde_json::to_string(&SamplingInterval::Daily).unwrap(),
            r#""daily""#
        );
    }
}
