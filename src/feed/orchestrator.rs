//! One full refresh cycle: metadata call, spacing, chart call, downsample.

use std::time::Duration;

use crate::api::{ApiResult, CoinGeckoClient};
use crate::shared::{downsample, Asset, QuoteSnapshot, Timeframe};

/// Default pause between the two calls of one refresh, so a single refresh
/// never lands both requests in the same upstream rate-limit window.
pub const DEFAULT_INTER_CALL_SPACING: Duration = Duration::from_secs(2);

/// Combined result of one successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    /// Validated quote from the metadata call.
    pub quote: QuoteSnapshot,
    /// Downsampled chronological price series from the chart call.
    pub series: Vec<f64>,
}

/// Fetch quote and price series for one asset/timeframe selection.
///
/// The two upstream calls are issued sequentially with `spacing` between
/// them rather than concurrently; the sequential strategy trades latency for
/// a lower chance of tripping the upstream rate limiter twice in one cycle.
///
/// Any failure aborts the whole refresh: either both the quote and the
/// series are produced, or neither is. An empty upstream chart yields an
/// empty series and is still a success.
///
/// # Errors
///
/// Propagates the first terminal [`crate::api::ApiError`] from either call,
/// including shape validation of the metadata response.
pub async fn fetch_snapshot(
    client: &CoinGeckoClient,
    asset: &Asset,
    timeframe: &Timeframe,
    spacing: Duration,
) -> ApiResult<MarketSnapshot> {
    tracing::debug!(asset = %asset.id, timeframe = timeframe.label, "refresh started");

    let coin = client.coin(&asset.id).await?;
    let quote = coin.quote()?;

    tokio::time::sleep(spacing).await;

    let chart = client
        .market_chart(&asset.id, timeframe.days, timeframe.interval)
        .await?;
    let raw = chart.price_series();
    let series = downsample(&raw, timeframe.target_points);

    tracing::debug!(
        asset = %asset.id,
        raw_points = raw.len(),
        kept_points = series.len(),
        "refresh fetched"
    );

    Ok(MarketSnapshot { quote, series })
}
