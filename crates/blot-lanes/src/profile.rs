use blot_core::{Error, Lane, PixelBuffer};

/// Column sums: one value per column, summed over all rows.
pub fn vertical_projection(img: &PixelBuffer) -> Vec<f64> {
    let mut proj = vec![0.0f64; img.width()];
    for y in 0..img.height() {
        for (acc, &v) in proj.iter_mut().zip(img.row(y)) {
            *acc += v;
        }
    }
    proj
}

/// Row sums restricted to the lane's columns `[x0, x1)`.
pub fn horizontal_profile(img: &PixelBuffer, lane: &Lane) -> Result<Vec<f64>, Error> {
    if !lane.fits(img.width()) {
        return Err(Error::LaneOutOfBounds {
            x0: lane.x0,
            x1: lane.x1,
            width: img.width(),
        });
    }

    Ok((0..img.height())
        .map(|y| img.row(y)[lane.x0..lane.x1].iter().sum())
        .collect())
}

/// Centered moving average over `2 * half_window + 1` samples. Near the ends
/// the window shrinks to the in-range neighbors; nothing is zero-padded.
pub fn moving_average(signal: &[f64], half_window: usize) -> Vec<f64> {
    let n = signal.len();
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half_window);
            let end = i.saturating_add(half_window).saturating_add(1).min(n);
            let window = &signal[start..end];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Arithmetic mean; `NaN` for an empty signal.
pub fn mean(signal: &[f64]) -> f64 {
    signal.iter().sum::<f64>() / signal.len() as f64
}
