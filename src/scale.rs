// Display scaling: one linear factor shared by every bar, derived from
// the bucket set with outlier clamping.

use crate::models::HourBucket;

/// A single outlier bucket may not stretch the effective max beyond this
/// multiple of the smallest average.
pub const OUTLIER_CLAMP_RATIO: f64 = 10.0;

/// Averages are normalized onto 0..=100 before pixel mapping.
const SCALE_SPAN: f64 = 100.0;

/// Derives the linear scale factor for a bucket set. Empty input and a
/// degenerate spread (clamped max equal to the min, i.e. every average
/// identical or the min at zero) both fall back to 1.0.
pub fn scale_factor(buckets: &[HourBucket]) -> f64 {
    let mut avgs = buckets.iter().map(|b| b.avg_latency_ms);
    let Some(first) = avgs.next() else {
        return 1.0;
    };
    let (min_val, max_val) = avgs.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let clamped_max = max_val.min(min_val * OUTLIER_CLAMP_RATIO);
    if clamped_max <= min_val {
        return 1.0;
    }
    SCALE_SPAN / (clamped_max - min_val)
}

/// Maps one bucket's average onto a bar height, clamped to the graph's
/// drawable range. This is the contract the rendering side draws with.
pub fn bar_height(avg_latency_ms: f64, factor: f64, max_height: u32) -> u32 {
    let height = avg_latency_ms * factor * (f64::from(max_height) / SCALE_SPAN);
    height.clamp(0.0, f64::from(max_height)) as u32
}

/// Selects the display window: the most recent `width` buckets, one bar
/// per bucket. Selection is independent of aggregation so either can be
/// exercised on its own.
pub fn display_window(buckets: &[HourBucket], width: usize) -> &[HourBucket] {
    let start = buckets.len().saturating_sub(width);
    &buckets[start..]
}
