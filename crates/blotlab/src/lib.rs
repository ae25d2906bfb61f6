//! Umbrella crate for the `blotlab` workspace.
//!
//! Re-exports the stage crates and adds the staged pipeline:
//! `PixelBuffer -> subtract_background -> detect_lanes -> detect_bands ->
//! measure_bands -> normalize`. Every stage allocates its output; nothing
//! upstream is mutated.

mod pipeline;

pub use blot_core::*;
pub use blot_lanes::*;
pub use blot_morph::*;
pub use blot_quant::*;
pub use pipeline::{
    Analysis, AnalysisConfig, BackgroundConfig, Detection, Quantification, analyze, detect,
};
