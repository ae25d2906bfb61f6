use blot_core::{BandRoi, Error, Lane, PixelBuffer};
use log::debug;
use rayon::prelude::*;

use crate::profile::{horizontal_profile, mean};
use crate::runs::runs_above;

#[derive(Debug, Clone, PartialEq)]
pub struct BandConfig {
    /// Minimum run length, in rows, for a band.
    pub min_band_height: usize,
    /// Band threshold is `mean + peak_fraction * (max - mean)` of the lane
    /// profile.
    pub peak_fraction: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            min_band_height: 5,
            peak_fraction: 0.5,
        }
    }
}

/// Detects bands in every lane. Output is grouped by lane in lane order;
/// within a lane, bands run top to bottom.
pub fn detect_bands(
    img: &PixelBuffer,
    lanes: &[Lane],
    cfg: &BandConfig,
) -> Result<Vec<BandRoi>, Error> {
    let per_lane = lanes
        .par_iter()
        .enumerate()
        .map(|(lane_idx, lane)| detect_bands_in_lane(img, lane_idx, lane, cfg))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(per_lane.into_iter().flatten().collect())
}

pub fn detect_bands_in_lane(
    img: &PixelBuffer,
    lane_idx: usize,
    lane: &Lane,
    cfg: &BandConfig,
) -> Result<Vec<BandRoi>, Error> {
    let profile = horizontal_profile(img, lane)?;
    let threshold = band_threshold(&profile, cfg.peak_fraction);

    let bands: Vec<BandRoi> = runs_above(&profile, threshold, cfg.min_band_height)
        .into_iter()
        .map(|rows| BandRoi {
            lane: lane_idx,
            y0: rows.start,
            y1: rows.end,
            x0: lane.x0,
            x1: lane.x1,
        })
        .collect();

    debug!(
        "detect_bands: lane={} threshold={:.3} bands={}",
        lane_idx,
        threshold,
        bands.len()
    );
    Ok(bands)
}

fn band_threshold(profile: &[f64], peak_fraction: f64) -> f64 {
    let m = mean(profile);
    let max = profile.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    m + peak_fraction * (max - m)
}
