use blot_core::{BandRoi, Error, Lane, PixelBuffer};
use blot_lanes::{BandConfig, LaneConfig, detect_bands, detect_lanes};
use blot_morph::subtract_background;
use blot_quant::{
    BandIntensity, ChartPoint, ExportRow, NormalizeConfig, NormalizedResult, measure_bands,
    normalize, to_chart_data, to_csv, to_export_rows,
};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    /// Rolling-ball radius in pixels.
    pub radius: usize,
    /// When false, detection and measurement run on the input as-is.
    pub enabled: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            radius: 50,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisConfig {
    pub background: BackgroundConfig,
    pub lanes: LaneConfig,
    pub bands: BandConfig,
    pub normalize: NormalizeConfig,
}

/// Geometry found on the background-corrected buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub corrected: PixelBuffer,
    pub lanes: Vec<Lane>,
    /// Grouped by lane, top to bottom within a lane.
    pub bands: Vec<BandRoi>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quantification {
    pub intensities: Vec<BandIntensity>,
    /// Lane-ascending, then band-index-ascending.
    pub results: Vec<NormalizedResult>,
    pub export_rows: Vec<ExportRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub detection: Detection,
    pub quantification: Quantification,
}

/// Background subtraction, lane detection and band detection.
pub fn detect(img: &PixelBuffer, cfg: &AnalysisConfig) -> Result<Detection, Error> {
    let corrected = if cfg.background.enabled {
        subtract_background(img, cfg.background.radius)
    } else {
        img.clone()
    };

    let lanes = detect_lanes(&corrected, &cfg.lanes);
    let bands = detect_bands(&corrected, &lanes, &cfg.bands)?;
    debug!(
        "detect: {}x{} lanes={} bands={}",
        img.width(),
        img.height(),
        lanes.len(),
        bands.len()
    );

    Ok(Detection {
        corrected,
        lanes,
        bands,
    })
}

impl Detection {
    /// Measures and normalizes the detected bands. Can be re-run with another
    /// control band without repeating detection.
    pub fn quantify(&self, cfg: &NormalizeConfig) -> Result<Quantification, Error> {
        let intensities = measure_bands(&self.corrected, &self.bands)?;
        let results = normalize(&intensities, cfg.control_band, cfg.control_lane);
        let export_rows = to_export_rows(&results);
        debug!(
            "quantify: control_band={} control_lane={} results={}",
            cfg.control_band,
            cfg.control_lane,
            results.len()
        );

        Ok(Quantification {
            intensities,
            results,
            export_rows,
        })
    }
}

impl Quantification {
    pub fn to_csv(&self) -> String {
        to_csv(&self.export_rows)
    }

    pub fn chart_data(&self, band_index: usize) -> Vec<ChartPoint> {
        to_chart_data(&self.results, band_index)
    }
}

/// Full pipeline: [`detect`] then [`Detection::quantify`].
pub fn analyze(img: &PixelBuffer, cfg: &AnalysisConfig) -> Result<Analysis, Error> {
    let detection = detect(img, cfg)?;
    let quantification = detection.quantify(&cfg.normalize)?;
    Ok(Analysis {
        detection,
        quantification,
    })
}
