use std::collections::BTreeMap;

use log::debug;

use crate::densitometry::BandIntensity;

/// Which band row is the loading control, and which lane is the fold-change
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizeConfig {
    pub control_band: usize,
    pub control_lane: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub lane: usize,
    pub band_index: usize,
    pub raw_intensity: f64,
    pub corrected_intensity: f64,
    pub normalized_intensity: f64,
    pub fold_change: f64,
}

/// Normalizes each band to its lane's control band, then expresses it relative
/// to the same band in `control_lane`.
///
/// Substitutions (never errors):
/// - lane without a control band: divisor `1`;
/// - control intensity `<= 0`: normalized intensity `0`;
/// - reference lane without the band: reference `1`;
/// - reference `<= 0`: fold change `0`.
///
/// Output is ordered by lane, then band index.
pub fn normalize(
    intensities: &[BandIntensity],
    control_band: usize,
    control_lane: usize,
) -> Vec<NormalizedResult> {
    let mut control: BTreeMap<usize, f64> = BTreeMap::new();
    for b in intensities.iter().filter(|b| b.band_index == control_band) {
        control.insert(b.lane, b.corrected_intensity);
    }

    let mut results: Vec<NormalizedResult> = intensities
        .iter()
        .map(|b| {
            let divisor = control.get(&b.lane).copied().unwrap_or_else(|| {
                debug!(
                    "normalize: lane {} has no control band {}; dividing by 1",
                    b.lane, control_band
                );
                1.0
            });
            let normalized_intensity = if divisor > 0.0 {
                b.corrected_intensity / divisor
            } else {
                0.0
            };

            NormalizedResult {
                lane: b.lane,
                band_index: b.band_index,
                raw_intensity: b.raw_intensity,
                corrected_intensity: b.corrected_intensity,
                normalized_intensity,
                fold_change: 0.0,
            }
        })
        .collect();

    let mut reference: BTreeMap<usize, f64> = BTreeMap::new();
    for r in results.iter().filter(|r| r.lane == control_lane) {
        reference.insert(r.band_index, r.normalized_intensity);
    }

    for r in &mut results {
        let ref_value = reference.get(&r.band_index).copied().unwrap_or_else(|| {
            debug!(
                "normalize: reference lane {} has no band {}; fold change against 1",
                control_lane, r.band_index
            );
            1.0
        });
        r.fold_change = if ref_value > 0.0 {
            r.normalized_intensity / ref_value
        } else {
            0.0
        };
    }

    results.sort_by_key(|r| (r.lane, r.band_index));
    results
}
