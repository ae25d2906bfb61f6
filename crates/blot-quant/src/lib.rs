//! Densitometry and normalization of detected bands.
//!
//! Stages:
//! - [`measure_bands`]: integrated intensity per ROI minus a local background
//!   taken from the ROI border.
//! - [`normalize`]: divide by the lane's loading-control band, then by the
//!   same band in a reference lane (fold change).
//! - [`to_export_rows`] / [`to_csv`] / [`to_chart_data`]: rounded tabular
//!   output for collaborators.
//!
//! Degenerate divisors are replaced by fixed values rather than reported;
//! see [`normalize`] for the exact substitutions.

mod densitometry;
mod export;
mod normalize;

pub use densitometry::{BandIntensity, border_background, integrated_intensity, measure_bands};
pub use export::{
    CSV_HEADER, ChartPoint, ExportRow, round_to, to_chart_data, to_csv, to_export_rows,
};
pub use normalize::{NormalizeConfig, NormalizedResult, normalize};
