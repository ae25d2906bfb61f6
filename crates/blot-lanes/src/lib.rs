//! Lane and band segmentation from 1D intensity profiles.
//!
//! Both stages reduce the image to a 1D profile and keep maximal runs of
//! samples strictly above a global threshold:
//! - Lanes: column sums, moving-average smoothed, threshold = mean.
//! - Bands: per-lane row sums, threshold = `mean + f * (max - mean)` with
//!   `f = BandConfig::peak_fraction` (0.5 by default), runs shorter than the
//!   minimum band height are dropped.
//!
//! Lane detection falls back to an equal-width split instead of failing; see
//! [`detect_lanes`].

mod bands;
mod lanes;
mod profile;
mod runs;

pub use bands::{BandConfig, detect_bands, detect_bands_in_lane};
pub use lanes::{LaneConfig, detect_lanes, split_into_equal_lanes};
pub use profile::{horizontal_profile, mean, moving_average, vertical_projection};
pub use runs::runs_above;
