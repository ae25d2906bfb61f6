use blot_core::{Lane, PixelBuffer};
use log::{debug, warn};

use crate::profile::{mean, moving_average, vertical_projection};
use crate::runs::runs_above;

#[derive(Debug, Clone, PartialEq)]
pub struct LaneConfig {
    /// Lane count the caller expects. Any other detected count is replaced by
    /// an equal-width split. `Some(0)` means "not given".
    pub expected_count: Option<usize>,
    pub smooth_half_window: usize,
    /// Equal-width lane count used when nothing is detected and no count is
    /// expected.
    pub fallback_count: usize,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            expected_count: None,
            smooth_half_window: 2,
            fallback_count: 4,
        }
    }
}

/// Detects lanes from the smoothed column projection.
///
/// Threshold is the mean of the smoothed projection; every maximal run of
/// columns strictly above it becomes a lane. Lanes are ordered left to right.
pub fn detect_lanes(img: &PixelBuffer, cfg: &LaneConfig) -> Vec<Lane> {
    let projection = vertical_projection(img);
    let smoothed = moving_average(&projection, cfg.smooth_half_window);
    let threshold = mean(&smoothed);

    let lanes: Vec<Lane> = runs_above(&smoothed, threshold, 1)
        .into_iter()
        .map(|r| Lane::new(r.start, r.end))
        .collect();
    debug!(
        "detect_lanes: width={} threshold={:.3} detected={}",
        img.width(),
        threshold,
        lanes.len()
    );

    match cfg.expected_count.filter(|&n| n > 0) {
        Some(expected) if lanes.len() != expected => {
            warn!(
                "detect_lanes: found {} lanes, expected {}; using {} equal-width lanes",
                lanes.len(),
                expected,
                expected
            );
            split_into_equal_lanes(img.width(), expected)
        }
        None if lanes.is_empty() => {
            warn!(
                "detect_lanes: no lanes found; using {} equal-width lanes",
                cfg.fallback_count
            );
            split_into_equal_lanes(img.width(), cfg.fallback_count)
        }
        _ => lanes,
    }
}

/// Splits `[0, width)` into `count` lanes of `width / count` columns; the last
/// lane absorbs the remainder.
pub fn split_into_equal_lanes(width: usize, count: usize) -> Vec<Lane> {
    if count == 0 {
        return Vec::new();
    }

    let lane_width = width / count;
    let mut lanes: Vec<Lane> = (0..count)
        .map(|i| Lane::new(i * lane_width, (i + 1) * lane_width))
        .collect();
    if let Some(last) = lanes.last_mut() {
        last.x1 = width;
    }
    lanes
}
