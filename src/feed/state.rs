//! Observable state published by the feed controller.

use chrono::{DateTime, Utc};

use crate::shared::{Asset, QuoteSnapshot, Timeframe};

/// Refresh lifecycle of the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedStatus {
    /// No refresh in flight; `quote`/`series` hold the last committed data.
    #[default]
    Idle,
    /// A refresh is in flight; previously committed data stays visible.
    Fetching,
    /// The last refresh failed; `quote`/`series` are cleared and `error`
    /// carries a user-facing message.
    Error,
}

/// Snapshot of everything a consumer needs to render the feed.
///
/// Published through a `tokio::sync::watch` channel; every update replaces
/// the whole value, so `quote` and `series` can never disagree about which
/// refresh they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    /// Refresh lifecycle.
    pub status: FeedStatus,
    /// Currently selected asset.
    pub asset: Asset,
    /// Currently selected timeframe.
    pub timeframe: Timeframe,
    /// Last committed quote, if any.
    pub quote: Option<QuoteSnapshot>,
    /// Last committed display series (chronological, downsampled).
    pub series: Vec<f64>,
    /// User-facing message for the last failure, if any.
    pub error: Option<String>,
    /// When the last successful refresh committed.
    pub last_updated: Option<DateTime<Utc>>,
}

impl FeedState {
    /// Initial state for the given selection: idle, no data, no error.
    pub fn new(asset: Asset, timeframe: Timeframe) -> Self {
        Self {
            status: FeedStatus::Idle,
            asset,
            timeframe,
            quote: None,
            series: Vec::new(),
            error: None,
            last_updated: None,
        }
    }

    /// Whether a refresh is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.status == FeedStatus::Fetching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_empty_and_idle() {
        let state = FeedState::new(Asset::default(), Timeframe::default());
        assert_eq!(state.status, FeedStatus::Idle);
        assert!(!state.in_flight());
        assert!(state.quote.is_none());
        assert!(state.series.is_empty());
        assert!(state.error.is_none());
        assert!(state.last_updated.is_none());
    }
}
