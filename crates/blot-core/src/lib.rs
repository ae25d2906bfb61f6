//! Shared data model for blot densitometry.
//!
//! ## Pixel Buffer
//! [`PixelBuffer`] is a dense, row-major `f64` raster with no stride padding.
//! Values nominally span 0..=255 but are never clamped here: morphology
//! produces negative and over-range intermediates.
//!
//! ## Border Policy
//! Out-of-range reads use clamp addressing: the nearest valid pixel is reused,
//! never zero padding. [`clamp_index`] centralizes the mapping so kernel loops
//! do not reimplement it.
//!
//! ## Geometry
//! [`Lane`] and [`BandRoi`] are half-open ranges in pixel indices. A lane's
//! position in the lane sequence is its identity downstream.

mod border;
mod error;
mod geom;
mod image;

pub use border::clamp_index;
pub use error::Error;
pub use geom::{BandRoi, Lane};
pub use image::PixelBuffer;
