//! Fixed-stride downsampling of price series.

/// Reduce an ordered series to roughly `target_points` elements by keeping
/// every `step`-th sample, where `step = len / target_points`.
///
/// When `len <= target_points` the series is returned unchanged. Otherwise
/// every element whose index is a multiple of `step` is kept, preserving
/// chronological order.
///
/// This is a stride sample, not an average: when `len` is not an exact
/// multiple of `step` the output may hold slightly more or fewer than
/// `target_points` elements (e.g. 7 samples at `target_points = 3` keep
/// indices 0, 2, 4 and 6). That deviation is deliberate and kept for display
/// stability; callers that need an exact count must trim themselves.
///
/// `target_points == 0` yields an empty series; dividing by the target only
/// happens once `len > target_points`, so `step >= 1` always holds.
pub fn downsample(series: &[f64], target_points: usize) -> Vec<f64> {
    if target_points == 0 {
        return Vec::new();
    }
    if series.len() <= target_points {
        return series.to_vec();
    }
    let step = series.len() / target_points;
    series
        .iter()
        .enumerate()
        .filter(|(i, _)| i % step == 0)
        .map(|(_, price)| *price)
        .collect()
}
