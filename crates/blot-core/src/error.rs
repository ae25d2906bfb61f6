use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Flat pixel data does not match `width * height`.
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("lane [{x0}, {x1}) is inverted or exceeds buffer width {width}")]
    LaneOutOfBounds { x0: usize, x1: usize, width: usize },
    #[error("roi in lane {lane} (x [{x0}, {x1}), y [{y0}, {y1})) is empty or out of bounds")]
    RoiOutOfBounds {
        lane: usize,
        x0: usize,
        x1: usize,
        y0: usize,
        y1: usize,
    },
}
