//! Rolling-ball background estimation.
//!
//! The background is the grayscale opening (erosion, then dilation) of the
//! image by a spherical structuring element; see [`BallKernel`] for its exact
//! shape. Reads outside the image reuse the nearest edge pixel.
//!
//! Cost is `O(W * H * r^2)`. Rows are processed in parallel; results do not
//! depend on the thread count.
//!
//! Only [`subtract_background`] and [`remove_background`] clamp to `>= 0`.
//! Eroded and background buffers may hold negative or over-range values.

mod ball;
mod rolling_ball;

pub use ball::{BallKernel, BallTap};
pub use rolling_ball::{
    dilate_ball, erode_ball, estimate_background, remove_background, subtract_background,
};
