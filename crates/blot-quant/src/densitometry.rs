use std::collections::HashMap;

use blot_core::{BandRoi, Error, PixelBuffer};
use rayon::prelude::*;

/// Measured intensity of one band ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct BandIntensity {
    pub lane: usize,
    /// Running position of the ROI among its lane's ROIs, in input order.
    pub band_index: usize,
    pub raw_intensity: f64,
    pub background_per_pixel: f64,
    pub corrected_intensity: f64,
}

/// Measures every ROI, in input order.
///
/// `corrected_intensity = max(0, raw - background_per_pixel * area)` where the
/// background is the mean of the ROI's border pixels and `area` is the full
/// rectangle area. All ROIs are validated before any is measured.
pub fn measure_bands(img: &PixelBuffer, rois: &[BandRoi]) -> Result<Vec<BandIntensity>, Error> {
    for roi in rois {
        check_roi(img, roi)?;
    }

    let measured: Vec<(f64, f64)> = rois
        .par_iter()
        .map(|roi| (sum_roi(img, roi), border_mean(img, roi)))
        .collect();

    let mut next_index: HashMap<usize, usize> = HashMap::new();
    Ok(rois
        .iter()
        .zip(measured)
        .map(|(roi, (raw, bg))| {
            let slot = next_index.entry(roi.lane).or_insert(0);
            let band_index = *slot;
            *slot += 1;

            let area = roi.area() as f64;
            BandIntensity {
                lane: roi.lane,
                band_index,
                raw_intensity: raw,
                background_per_pixel: bg,
                corrected_intensity: (raw - bg * area).max(0.0),
            }
        })
        .collect())
}

/// Sum of all pixels inside the half-open ROI.
pub fn integrated_intensity(img: &PixelBuffer, roi: &BandRoi) -> Result<f64, Error> {
    check_roi(img, roi)?;
    Ok(sum_roi(img, roi))
}

/// Mean of the ROI border. Top and bottom rows are taken in full; side
/// columns only for rows strictly between them, so each corner counts once.
/// A one-row ROI contributes its row once.
pub fn border_background(img: &PixelBuffer, roi: &BandRoi) -> Result<f64, Error> {
    check_roi(img, roi)?;
    Ok(border_mean(img, roi))
}

fn check_roi(img: &PixelBuffer, roi: &BandRoi) -> Result<(), Error> {
    if roi.fits(img.width(), img.height()) {
        Ok(())
    } else {
        Err(Error::RoiOutOfBounds {
            lane: roi.lane,
            x0: roi.x0,
            x1: roi.x1,
            y0: roi.y0,
            y1: roi.y1,
        })
    }
}

fn sum_roi(img: &PixelBuffer, roi: &BandRoi) -> f64 {
    (roi.y0..roi.y1)
        .map(|y| img.row(y)[roi.x0..roi.x1].iter().sum::<f64>())
        .sum()
}

fn border_mean(img: &PixelBuffer, roi: &BandRoi) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    let top = &img.row(roi.y0)[roi.x0..roi.x1];
    sum += top.iter().sum::<f64>();
    count += top.len();

    let last_row = roi.y1 - 1;
    if last_row > roi.y0 {
        let bottom = &img.row(last_row)[roi.x0..roi.x1];
        sum += bottom.iter().sum::<f64>();
        count += bottom.len();
    }

    let last_col = roi.x1 - 1;
    for y in (roi.y0 + 1)..last_row {
        let row = img.row(y);
        sum += row[roi.x0];
        count += 1;
        if last_col > roi.x0 {
            sum += row[last_col];
            count += 1;
        }
    }

    if count > 0 { sum / count as f64 } else { 0.0 }
}
