/// Maps a possibly out-of-range index onto `[0, len)` by clamping to the
/// nearest edge element. Returns `None` only for an empty axis.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i < 0 {
        Some(0)
    } else {
        Some((i as usize).min(len - 1))
    }
}
