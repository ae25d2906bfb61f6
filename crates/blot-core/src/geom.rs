/// Half-open column range `[x0, x1)` holding one sample track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lane {
    pub x0: usize,
    pub x1: usize,
}

impl Lane {
    pub fn new(x0: usize, x1: usize) -> Self {
        Self { x0, x1 }
    }

    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    /// True when the lane lies within `[0, width)`. Zero-width lanes fit: the
    /// equal-split fallback produces them for images narrower than the lane
    /// count.
    pub fn fits(&self, width: usize) -> bool {
        self.x0 <= self.x1 && self.x1 <= width
    }
}

/// Half-open rectangle bounding one band. `x0`/`x1` are copied from the
/// owning lane; `lane` is that lane's index in the lane sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BandRoi {
    pub lane: usize,
    pub y0: usize,
    pub y1: usize,
    pub x0: usize,
    pub x1: usize,
}

impl BandRoi {
    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    /// Full rectangle area, not the border pixel count.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.x0 < self.x1 && self.y0 < self.y1 && self.x1 <= width && self.y1 <= height
    }
}

#[cfg(test)]
mod tests {
    use super::{BandRoi, Lane};

    #[test]
    fn lane_width_and_fit() {
        let lane = Lane::new(25, 50);
        assert_eq!(lane.width(), 25);
        assert!(lane.fits(50));
        assert!(!lane.fits(49));
        assert!(Lane::new(3, 3).fits(10));
        assert!(!Lane::new(4, 3).fits(10));
    }

    #[test]
    fn roi_area_covers_full_rectangle() {
        let roi = BandRoi {
            lane: 2,
            y0: 4,
            y1: 9,
            x0: 10,
            x1: 16,
        };
        assert_eq!(roi.width(), 6);
        assert_eq!(roi.height(), 5);
        assert_eq!(roi.area(), 30);
        assert!(roi.fits(16, 9));
        assert!(!roi.fits(15, 9));
    }
}
