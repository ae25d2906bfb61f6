use blot_core::{Error, PixelBuffer, clamp_index};
use log::debug;
use rayon::prelude::*;

use crate::ball::BallKernel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Min,
    Max,
}

/// Grayscale erosion: `min` over taps of `src(p + offset) - height`.
pub fn erode_ball(src: &PixelBuffer, kernel: &BallKernel) -> PixelBuffer {
    apply_extremum(src, kernel, Extremum::Min)
}

/// Grayscale dilation: `max` over taps of `src(p + offset) + height`.
pub fn dilate_ball(src: &PixelBuffer, kernel: &BallKernel) -> PixelBuffer {
    apply_extremum(src, kernel, Extremum::Max)
}

/// Background as the morphological opening of `src` by a ball of `radius`.
pub fn estimate_background(src: &PixelBuffer, radius: usize) -> PixelBuffer {
    let kernel = BallKernel::new(radius);
    debug!(
        "rolling ball: radius={} taps={} image={}x{}",
        radius,
        kernel.taps().len(),
        src.width(),
        src.height()
    );
    let eroded = erode_ball(src, &kernel);
    dilate_ball(&eroded, &kernel)
}

/// `max(0, src - background)` with the background estimated at `radius`.
pub fn subtract_background(src: &PixelBuffer, radius: usize) -> PixelBuffer {
    let background = estimate_background(src, radius);
    remove_background(src, &background).expect("background has the input's shape")
}

/// `max(0, src - background)` per pixel for an already estimated background.
pub fn remove_background(
    src: &PixelBuffer,
    background: &PixelBuffer,
) -> Result<PixelBuffer, Error> {
    if src.width() != background.width() || src.height() != background.height() {
        return Err(Error::SizeMismatch {
            expected: src.data().len(),
            actual: background.data().len(),
        });
    }

    let values = src
        .data()
        .iter()
        .zip(background.data())
        .map(|(&v, &bg)| (v - bg).max(0.0))
        .collect();
    PixelBuffer::from_vec(src.width(), src.height(), values)
}

fn apply_extremum(src: &PixelBuffer, kernel: &BallKernel, op: Extremum) -> PixelBuffer {
    let width = src.width();
    let height = src.height();
    if src.is_empty() {
        return src.clone();
    }

    let init = match op {
        Extremum::Min => f64::INFINITY,
        Extremum::Max => f64::NEG_INFINITY,
    };
    let mut out = vec![init; width * height];

    // Tap-outer, column-inner: each tap is one shifted row scan with clamped
    // ends.
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for tap in kernel.taps() {
                let sy = clamp_index(y as isize + tap.dy, height)
                    .expect("valid mapped row for non-empty buffer");
                let offset = match op {
                    Extremum::Min => -tap.height,
                    Extremum::Max => tap.height,
                };
                accumulate_shifted_row(out_row, src.row(sy), tap.dx, offset, op);
            }
        });

    PixelBuffer::from_vec(width, height, out).expect("morphology preserves buffer shape")
}

fn accumulate_shifted_row(out: &mut [f64], src: &[f64], dx: isize, offset: f64, op: Extremum) {
    let n = out.len();
    let n_i = n as isize;

    // `[lo, hi)` is where `x + dx` lands inside the row.
    let lo = (-dx).clamp(0, n_i) as usize;
    let hi = (n_i - dx).clamp(0, n_i) as usize;

    // Clamp border: columns left of the row reuse `src[0]`, columns right of
    // it reuse `src[n - 1]`, the same mapping `clamp_index` gives.
    let left = src[0] + offset;
    for o in &mut out[..lo] {
        *o = pick(*o, left, op);
    }

    if lo < hi {
        let start = (lo as isize + dx) as usize;
        for (o, &s) in out[lo..hi].iter_mut().zip(&src[start..]) {
            *o = pick(*o, s + offset, op);
        }
    }

    let right = src[n - 1] + offset;
    for o in &mut out[hi.max(lo)..] {
        *o = pick(*o, right, op);
    }
}

#[inline]
fn pick(acc: f64, v: f64, op: Extremum) -> f64 {
    match op {
        Extremum::Min => acc.min(v),
        Extremum::Max => acc.max(v),
    }
}

#[cfg(test)]
mod tests {
    use blot_core::{Error, PixelBuffer};

    use super::{
        dilate_ball, erode_ball, estimate_background, remove_background, subtract_background,
    };
    use crate::ball::BallKernel;

    /// Direct per-pixel evaluation with clamped reads.
    fn reference_extremum(src: &PixelBuffer, radius: usize, erode: bool) -> Vec<f64> {
        let kernel = BallKernel::new(radius);
        let mut out = Vec::with_capacity(src.data().len());
        for y in 0..src.height() as isize {
            for x in 0..src.width() as isize {
                let mut acc = if erode {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                };
                for t in kernel.taps() {
                    let v = src.get_clamped(x + t.dx, y + t.dy).expect("non-empty");
                    acc = if erode {
                        acc.min(v - t.height)
                    } else {
                        acc.max(v + t.height)
                    };
                }
                out.push(acc);
            }
        }
        out
    }

    fn spot_image(size: usize, spot: std::ops::Range<usize>, bg: f64, fg: f64) -> PixelBuffer {
        let mut buf = PixelBuffer::new_fill(size, size, bg);
        for y in spot.clone() {
            for x in spot.clone() {
                buf.set(x, y, fg);
            }
        }
        buf
    }

    #[test]
    fn uniform_image_subtracts_to_zero() {
        let img = PixelBuffer::new_fill(20, 20, 100.0);
        for radius in 1..=4 {
            let out = subtract_background(&img, radius);
            assert!(
                out.data().iter().all(|&v| v.abs() < 1e-9),
                "radius {radius}"
            );
        }
    }

    #[test]
    fn zero_radius_background_equals_input() {
        let values = vec![4.0, -1.0, 300.0, 7.5, 0.0, 12.0];
        let img = PixelBuffer::from_vec(3, 2, values).expect("valid buffer");
        assert_eq!(estimate_background(&img, 0), img);
        assert!(
            subtract_background(&img, 0)
                .data()
                .iter()
                .all(|&v| v == 0.0)
        );
    }

    #[test]
    fn output_is_non_negative() {
        let values = vec![0.0, 50.0, 100.0, 50.0, 0.0, 50.0, 100.0, 50.0, 0.0];
        let img = PixelBuffer::from_vec(3, 3, values).expect("valid buffer");
        for radius in 0..=5 {
            let out = subtract_background(&img, radius);
            assert!(out.data().iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn preserves_spot_smaller_than_ball() {
        let img = spot_image(20, 8..13, 10.0, 200.0);
        let out = subtract_background(&img, 3);

        assert!(out.data()[10 * 20 + 10] > 50.0);
        assert!(out.data()[0].abs() < 0.5);
    }

    #[test]
    fn flattens_plateau_wider_than_ball() {
        let img = spot_image(40, 10..30, 10.0, 200.0);
        let out = subtract_background(&img, 3);

        assert!(out.data()[20 * 40 + 20].abs() < 1e-9);
        assert!(out.data()[0].abs() < 1e-9);
    }

    #[test]
    fn radius_larger_than_image_uses_clamped_border() {
        let values = vec![5.0, 9.0, 1.0, 2.0, 8.0, 3.0];
        let img = PixelBuffer::from_vec(3, 2, values).expect("valid buffer");
        let bg = estimate_background(&img, 10);
        assert_eq!(bg.width(), 3);
        assert_eq!(bg.height(), 2);
        assert!(bg.data().iter().all(|v| v.is_finite()));

        let eroded = erode_ball(&img, &BallKernel::new(10));
        assert_eq!(eroded.data(), reference_extremum(&img, 10, true).as_slice());
    }

    #[test]
    fn row_scan_matches_direct_evaluation() {
        let values: Vec<f64> = (0..7 * 5).map(|i| ((i * 37) % 23) as f64 - 4.0).collect();
        let img = PixelBuffer::from_vec(7, 5, values).expect("valid buffer");

        for radius in [1, 2, 3, 6] {
            let kernel = BallKernel::new(radius);
            let eroded = erode_ball(&img, &kernel);
            assert_eq!(
                eroded.data(),
                reference_extremum(&img, radius, true).as_slice()
            );

            let dilated = dilate_ball(&img, &kernel);
            assert_eq!(
                dilated.data(),
                reference_extremum(&img, radius, false).as_slice()
            );
        }
    }

    #[test]
    fn removing_estimated_background_matches_one_shot_subtraction() {
        let img = spot_image(24, 9..14, 30.0, 180.0);
        let background = estimate_background(&img, 4);
        let corrected = remove_background(&img, &background).expect("same shape");
        assert_eq!(corrected, subtract_background(&img, 4));

        let wrong = PixelBuffer::new_fill(23, 24, 0.0);
        assert_eq!(
            remove_background(&img, &wrong),
            Err(Error::SizeMismatch {
                expected: 24 * 24,
                actual: 23 * 24
            })
        );
    }

    #[test]
    fn empty_buffer_passes_through() {
        let img = PixelBuffer::new_fill(0, 4, 0.0);
        assert!(subtract_background(&img, 3).is_empty());
    }
}
