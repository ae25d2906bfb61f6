use blotlab::PixelBuffer;

pub const WIDTH: usize = 80;
pub const HEIGHT: usize = 60;
pub const LANES: [(usize, usize); 4] = [(4, 16), (24, 36), (44, 56), (64, 76)];
pub const TARGET_ROWS: (usize, usize) = (10, 20);
pub const CONTROL_ROWS: (usize, usize) = (36, 46);
pub const TARGET_SIGNAL: [f64; 4] = [120.0, 140.0, 160.0, 180.0];
pub const CONTROL_SIGNAL: f64 = 150.0;

/// Peaks at 1 in the middle of `[lo, hi)` and falls off linearly to `1 - drop`.
fn tent(t: usize, lo: usize, hi: usize, drop: f64) -> f64 {
    let center = (lo + hi - 1) as f64 / 2.0;
    let half = (hi - lo) as f64 / 2.0;
    1.0 - drop * (t as f64 - center).abs() / half
}

fn in_range(t: usize, (lo, hi): (usize, usize)) -> bool {
    lo <= t && t < hi
}

/// Four lanes on a left-to-right background ramp. Each lane carries a target
/// band of increasing strength above a constant loading-control band.
pub fn four_lane_blot() -> PixelBuffer {
    let mut values = Vec::with_capacity(WIDTH * HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let mut v = 20.0 + 10.0 * x as f64 / WIDTH as f64;
            for (li, &(x0, x1)) in LANES.iter().enumerate() {
                if !in_range(x, (x0, x1)) {
                    continue;
                }
                let across = tent(x, x0, x1, 0.5);
                if in_range(y, TARGET_ROWS) {
                    v += TARGET_SIGNAL[li] * tent(y, TARGET_ROWS.0, TARGET_ROWS.1, 0.3) * across;
                }
                if in_range(y, CONTROL_ROWS) {
                    v += CONTROL_SIGNAL * tent(y, CONTROL_ROWS.0, CONTROL_ROWS.1, 0.3) * across;
                }
            }
            values.push(v);
        }
    }
    PixelBuffer::from_vec(WIDTH, HEIGHT, values).expect("dimensions match")
}
