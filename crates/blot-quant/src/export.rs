use crate::normalize::NormalizedResult;

pub const CSV_HEADER: &str =
    "Lane,Band,RawIntensity,CorrectedIntensity,NormalizedIntensity,FoldChange";

/// One result with display rounding applied: intensities to 2 decimals,
/// normalized intensity and fold change to 4.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub lane: usize,
    pub band: usize,
    pub raw_intensity: f64,
    pub corrected_intensity: f64,
    pub normalized_intensity: f64,
    pub fold_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub lane: usize,
    pub value: f64,
}

pub fn to_export_rows(results: &[NormalizedResult]) -> Vec<ExportRow> {
    results
        .iter()
        .map(|r| ExportRow {
            lane: r.lane,
            band: r.band_index,
            raw_intensity: round_to(r.raw_intensity, 2),
            corrected_intensity: round_to(r.corrected_intensity, 2),
            normalized_intensity: round_to(r.normalized_intensity, 4),
            fold_change: round_to(r.fold_change, 4),
        })
        .collect()
}

/// Header plus one line per row, joined by `\n`, no trailing newline.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for r in rows {
        lines.push(format!(
            "{},{},{},{},{},{}",
            r.lane,
            r.band,
            format_number(r.raw_intensity),
            format_number(r.corrected_intensity),
            format_number(r.normalized_intensity),
            format_number(r.fold_change),
        ));
    }
    lines.join("\n")
}

/// Normalized intensity per lane for one band row, in result order.
pub fn to_chart_data(results: &[NormalizedResult], band_index: usize) -> Vec<ChartPoint> {
    results
        .iter()
        .filter(|r| r.band_index == band_index)
        .map(|r| ChartPoint {
            lane: r.lane,
            value: r.normalized_intensity,
        })
        .collect()
}

/// Rounds half toward positive infinity at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let scaled = value * scale;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    };
    rounded / scale
}

/// Shortest round-trip form. Integral values print without a fractional
/// part and negative zero prints as `0`. Magnitudes of at least `1e21` or
/// below `1e-6` use exponent notation with an explicit sign (`1e+21`,
/// `1.5e-7`).
fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{value:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        };
    }
    format!("{value}")
}
