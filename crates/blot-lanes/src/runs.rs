use std::ops::Range;

/// Maximal runs of samples strictly above `threshold`, left to right.
///
/// A run is kept when its length is at least `min_len`. A run still open at
/// the end of the signal closes at `signal.len()` under the same rule.
pub fn runs_above(signal: &[f64], threshold: f64, min_len: usize) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &v) in signal.iter().enumerate() {
        match start {
            None if v > threshold => start = Some(i),
            Some(s) if v <= threshold => {
                if i - s >= min_len {
                    runs.push(s..i);
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start
        && signal.len() - s >= min_len
    {
        runs.push(s..signal.len());
    }

    runs
}
