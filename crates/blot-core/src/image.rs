use crate::Error;
use crate::border::clamp_index;

/// Dense row-major grayscale raster.
///
/// Values are `f64` and unbounded: intermediate morphology results may be
/// negative or exceed 255. Stages never mutate their input; each one that
/// transforms pixels allocates a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl PixelBuffer {
    pub fn from_vec(width: usize, height: usize, values: Vec<f64>) -> Result<Self, Error> {
        let expected = checked_len(width, height, values.len())?;

        if values.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn new_fill(width: usize, height: usize, value: f64) -> Self {
        let len = width.checked_mul(height).expect("buffer size overflow");
        Self {
            width,
            height,
            values: vec![value; len],
        }
    }

    /// Converts interleaved RGBA bytes with Rec. 601 luma weights.
    /// Alpha is ignored.
    pub fn from_rgba8(width: usize, height: usize, rgba: &[u8]) -> Result<Self, Error> {
        let pixels = checked_len(width, height, rgba.len())?;
        let expected = pixels.checked_mul(4).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: rgba.len(),
        })?;
        if rgba.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }

        let values = rgba
            .chunks_exact(4)
            .map(|px| {
                0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2])
            })
            .collect();

        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, y: usize) -> &[f64] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.width;
        &self.values[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }

    /// Reads a pixel, reusing the nearest edge pixel for out-of-range
    /// coordinates. Returns `None` only for an empty buffer.
    pub fn get_clamped(&self, x: isize, y: isize) -> Option<f64> {
        let cx = clamp_index(x, self.width)?;
        let cy = clamp_index(y, self.height)?;
        self.values.get(cy * self.width + cx).copied()
    }

    /// Writes an in-bounds pixel; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        if x < self.width && y < self.height {
            self.values[y * self.width + x] = value;
        }
    }

    /// Linear min/max stretch to `0..=255`. A flat buffer maps to all zeros.
    pub fn to_luma8_normalized(&self) -> Vec<u8> {
        if self.values.is_empty() {
            return Vec::new();
        }

        let (min_v, max_v) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if (max_v - min_v).abs() < 1e-12 {
            return vec![0u8; self.values.len()];
        }

        let scale = 255.0 / (max_v - min_v);
        self.values
            .iter()
            .map(|&v| ((v - min_v) * scale).round().clamp(0.0, 255.0) as u8)
            .collect()
    }
}

fn checked_len(width: usize, height: usize, actual: usize) -> Result<usize, Error> {
    width.checked_mul(height).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::PixelBuffer;
    use crate::Error;

    #[test]
    fn from_vec_rejects_length_mismatch() {
        let err = PixelBuffer::from_vec(2, 2, vec![1.0, 2.0, 3.0]).expect_err("must fail");
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn from_vec_row_major_layout() {
        let values = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let buf = PixelBuffer::from_vec(3, 2, values).expect("valid buffer");
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.row(1), &[40.0, 50.0, 60.0]);
        assert_eq!(buf.get(2, 1), Some(60.0));
        assert_eq!(buf.get(3, 0), None);
    }

    #[test]
    fn new_fill_sets_every_pixel() {
        let buf = PixelBuffer::new_fill(10, 5, 128.0);
        assert_eq!(buf.data().len(), 50);
        assert!(buf.data().iter().all(|&v| v == 128.0));
    }

    #[test]
    fn get_clamped_reuses_edge_pixels() {
        let buf = PixelBuffer::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("valid buffer");
        assert_eq!(buf.get_clamped(0, 0), Some(1.0));
        assert_eq!(buf.get_clamped(1, 0), Some(2.0));
        assert_eq!(buf.get_clamped(-1, 0), Some(1.0));
        assert_eq!(buf.get_clamped(5, 1), Some(4.0));
        assert_eq!(buf.get_clamped(-7, 9), Some(3.0));

        let empty = PixelBuffer::new_fill(0, 3, 0.0);
        assert_eq!(empty.get_clamped(0, 0), None);
    }

    #[test]
    fn set_ignores_out_of_range_writes() {
        let mut buf = PixelBuffer::new_fill(3, 3, 0.0);
        buf.set(1, 1, 200.0);
        buf.set(3, 1, 7.0);
        assert_eq!(buf.data()[4], 200.0);
        assert_eq!(buf.data().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn rgba_uses_luma_weights() {
        let white_black = [255, 255, 255, 255, 0, 0, 0, 255];
        let buf = PixelBuffer::from_rgba8(2, 1, &white_black).expect("valid rgba");
        assert!((buf.data()[0] - 255.0).abs() < 1e-9);
        assert!(buf.data()[1].abs() < 1e-9);

        let red = PixelBuffer::from_rgba8(1, 1, &[255, 0, 0, 255]).expect("valid rgba");
        assert!((red.data()[0] - 76.245).abs() < 1e-9);

        assert!(PixelBuffer::from_rgba8(1, 1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn normalized_preview_stretches_min_to_max() {
        let values = vec![-100.0, -20.0, 20.0, 100.0];
        let buf = PixelBuffer::from_vec(2, 2, values).expect("valid buffer");
        assert_eq!(buf.to_luma8_normalized(), vec![0, 102, 153, 255]);
        assert_eq!(
            PixelBuffer::new_fill(2, 2, 9.0).to_luma8_normalized(),
            vec![0; 4]
        );
    }
}
