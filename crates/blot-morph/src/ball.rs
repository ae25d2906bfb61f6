/// One included offset of the spherical structuring element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallTap {
    pub dx: isize,
    pub dy: isize,
    pub height: f64,
}

/// Spherical ("rolling ball") structuring element.
///
/// Conventions:
/// - Window is `(2r+1) x (2r+1)`.
/// - An offset is included iff `dx^2 + dy^2 <= r^2`; its height is
///   `sqrt(r^2 - dx^2 - dy^2)`. Rim offsets at exactly `r` are included with
///   height `0`; corner offsets beyond `r` are excluded outright.
/// - `radius = 0` is the single zero-height tap at the origin.
#[derive(Debug, Clone)]
pub struct BallKernel {
    taps: Vec<BallTap>,
}

impl BallKernel {
    pub fn new(radius: usize) -> Self {
        let r = radius as isize;
        let r2 = r * r;
        let side = 2 * radius + 1;
        let mut taps = Vec::with_capacity(side * side);

        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > r2 {
                    continue;
                }
                taps.push(BallTap {
                    dx,
                    dy,
                    height: ((r2 - d2) as f64).sqrt(),
                });
            }
        }

        Self { taps }
    }

    pub fn taps(&self) -> &[BallTap] {
        &self.taps
    }
}

#[cfg(test)]
mod tests {
    use super::BallKernel;

    #[test]
    fn zero_radius_is_single_flat_tap() {
        let k = BallKernel::new(0);
        assert_eq!(k.taps().len(), 1);
        assert_eq!(k.taps()[0].dx, 0);
        assert_eq!(k.taps()[0].dy, 0);
        assert_eq!(k.taps()[0].height, 0.0);
    }

    #[test]
    fn radius_two_excludes_corners_keeps_rim() {
        let k = BallKernel::new(2);
        // 5x5 window minus the 4 corners (d2 = 8) and the 8 knight offsets (d2 = 5).
        assert_eq!(k.taps().len(), 13);

        let rim = k
            .taps()
            .iter()
            .find(|t| t.dx == 2 && t.dy == 0)
            .expect("rim tap included");
        assert_eq!(rim.height, 0.0);
        assert!(!k.taps().iter().any(|t| t.dx == 2 && t.dy == 2));

        let center = k
            .taps()
            .iter()
            .find(|t| t.dx == 0 && t.dy == 0)
            .expect("center tap");
        assert!((center.height - 2.0).abs() < 1e-12);
    }

    #[test]
    fn heights_are_symmetric() {
        let k = BallKernel::new(4);
        for t in k.taps() {
            let mirror = k
                .taps()
                .iter()
                .find(|m| m.dx == -t.dx && m.dy == -t.dy)
                .expect("mirror tap");
            assert_eq!(t.height, mirror.height);
        }
    }
}
