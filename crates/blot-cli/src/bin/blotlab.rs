use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use blotlab::{
    AnalysisConfig, BandRoi, ChartPoint, Lane, PixelBuffer, analyze, estimate_background,
    remove_background, round_to,
};
use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Rgb, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "blotlab")]
#[command(about = "Western blot densitometry: background, lanes, bands, normalization")]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and export results.
    #[command(name = "analyze")]
    Analyze(AnalyzeArgs),
    /// Only estimate and subtract the rolling-ball background.
    #[command(name = "background")]
    Background(BackgroundArgs),
}

#[derive(Args, Debug, Clone)]
struct IoArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "blotlab-out")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[command(flatten)]
    io: IoArgs,
    /// JSON file with any subset of the tuning fields; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    radius: Option<usize>,
    #[arg(long)]
    no_background: bool,
    /// Expected lane count; a different detected count falls back to an equal split.
    #[arg(long)]
    lanes: Option<usize>,
    #[arg(long)]
    smooth_half_window: Option<usize>,
    #[arg(long)]
    fallback_lanes: Option<usize>,
    #[arg(long)]
    min_band_height: Option<usize>,
    #[arg(long)]
    peak_fraction: Option<f64>,
    #[arg(long)]
    control_band: Option<usize>,
    #[arg(long)]
    control_lane: Option<usize>,
    /// Band index written to chart.csv.
    #[arg(long, default_value_t = 0)]
    chart_band: usize,
}

#[derive(Args, Debug, Clone)]
struct BackgroundArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, default_value_t = 50)]
    radius: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    radius: Option<usize>,
    background: Option<bool>,
    lanes: Option<usize>,
    smooth_half_window: Option<usize>,
    fallback_lanes: Option<usize>,
    min_band_height: Option<usize>,
    peak_fraction: Option<f64>,
    control_band: Option<usize>,
    control_lane: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct LaneDto {
    x0: usize,
    x1: usize,
}

#[derive(Debug, Clone, Serialize)]
struct BandDto {
    lane: usize,
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

#[derive(Debug, Clone, Serialize)]
struct ResultDto {
    lane: usize,
    band: usize,
    raw_intensity: f64,
    corrected_intensity: f64,
    normalized_intensity: f64,
    fold_change: f64,
}

#[derive(Debug, Clone, Serialize)]
struct MetaDto {
    background_radius: usize,
    background_enabled: bool,
    expected_lanes: Option<usize>,
    min_band_height: usize,
    peak_fraction: f64,
    control_band: usize,
    control_lane: usize,
}

#[derive(Debug, Clone, Serialize)]
struct ResultsDto {
    width: usize,
    height: usize,
    meta: MetaDto,
    lanes: Vec<LaneDto>,
    bands: Vec<BandDto>,
    results: Vec<ResultDto>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.cmd {
        Command::Analyze(args) => run_analyze(args),
        Command::Background(args) => run_background(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let img = load_input(&args.io.input)?;
    let file = match &args.config {
        Some(path) => {
            read_json(path).with_context(|| format!("reading config json at {}", path.display()))?
        }
        None => ConfigFile::default(),
    };
    let cfg = resolve_config(&file, &args)?;
    let out = prepare_out_dir(&args.io.out)?;

    let analysis = analyze(&img, &cfg).context("running analysis")?;
    let det = &analysis.detection;
    let quant = &analysis.quantification;
    info!(
        "{}: {} lanes, {} bands",
        args.io.input.display(),
        det.lanes.len(),
        det.bands.len()
    );

    fs::write(out.join("results.csv"), quant.to_csv())
        .with_context(|| format!("writing {}", out.join("results.csv").display()))?;
    write_chart_csv(out.join("chart.csv"), &quant.chart_data(args.chart_band))?;

    write_json(
        out.join("results.json"),
        &ResultsDto {
            width: img.width(),
            height: img.height(),
            meta: MetaDto {
                background_radius: cfg.background.radius,
                background_enabled: cfg.background.enabled,
                expected_lanes: cfg.lanes.expected_count,
                min_band_height: cfg.bands.min_band_height,
                peak_fraction: cfg.bands.peak_fraction,
                control_band: cfg.normalize.control_band,
                control_lane: cfg.normalize.control_lane,
            },
            lanes: det
                .lanes
                .iter()
                .map(|l| LaneDto { x0: l.x0, x1: l.x1 })
                .collect(),
            bands: det
                .bands
                .iter()
                .map(|b| BandDto {
                    lane: b.lane,
                    x0: b.x0,
                    x1: b.x1,
                    y0: b.y0,
                    y1: b.y1,
                })
                .collect(),
            results: quant
                .export_rows
                .iter()
                .map(|r| ResultDto {
                    lane: r.lane,
                    band: r.band,
                    raw_intensity: r.raw_intensity,
                    corrected_intensity: r.corrected_intensity,
                    normalized_intensity: r.normalized_intensity,
                    fold_change: r.fold_change,
                })
                .collect(),
        },
    )?;

    save_preview(out.join("corrected.png"), &det.corrected)?;
    render_overlay(&det.corrected, &det.lanes, &det.bands)?
        .save(out.join("overlay.png"))
        .context("writing overlay.png")?;

    Ok(())
}

fn run_background(args: BackgroundArgs) -> Result<()> {
    let img = load_input(&args.io.input)?;
    let out = prepare_out_dir(&args.io.out)?;

    let background = estimate_background(&img, args.radius);
    let corrected = remove_background(&img, &background).context("subtracting background")?;
    info!(
        "{}: rolling ball radius {}",
        args.io.input.display(),
        args.radius
    );

    save_preview(out.join("background.png"), &background)?;
    save_preview(out.join("corrected.png"), &corrected)?;
    Ok(())
}

fn resolve_config(file: &ConfigFile, args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut cfg = AnalysisConfig::default();

    if let Some(r) = args.radius.or(file.radius) {
        cfg.background.radius = r;
    }
    if let Some(enabled) = file.background {
        cfg.background.enabled = enabled;
    }
    if args.no_background {
        cfg.background.enabled = false;
    }

    cfg.lanes.expected_count = args.lanes.or(file.lanes).filter(|&n| n > 0);
    if let Some(w) = args.smooth_half_window.or(file.smooth_half_window) {
        cfg.lanes.smooth_half_window = w;
    }
    if let Some(n) = args.fallback_lanes.or(file.fallback_lanes) {
        cfg.lanes.fallback_count = n;
    }

    if let Some(h) = args.min_band_height.or(file.min_band_height) {
        cfg.bands.min_band_height = h;
    }
    if let Some(f) = args.peak_fraction.or(file.peak_fraction) {
        if !(0.0..=1.0).contains(&f) {
            bail!("peak_fraction must lie in [0, 1], got {f}.");
        }
        cfg.bands.peak_fraction = f;
    }

    if let Some(b) = args.control_band.or(file.control_band) {
        cfg.normalize.control_band = b;
    }
    if let Some(l) = args.control_lane.or(file.control_lane) {
        cfg.normalize.control_lane = l;
    }

    Ok(cfg)
}

fn load_input(path: &Path) -> Result<PixelBuffer> {
    ensure_file_exists(path, "input")?;
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();

    PixelBuffer::from_rgba8(w as usize, h as usize, rgba.as_raw())
        .with_context(|| format!("converting {} to a gray buffer", path.display()))
}

fn prepare_out_dir(out: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out)
        .with_context(|| format!("creating output directory {}", out.display()))?;
    Ok(out.to_path_buf())
}

fn gray_preview(buf: &PixelBuffer) -> Result<GrayImage> {
    GrayImage::from_raw(
        buf.width() as u32,
        buf.height() as u32,
        buf.to_luma8_normalized(),
    )
    .context("constructing GrayImage from buffer preview")
}

fn save_preview(path: PathBuf, buf: &PixelBuffer) -> Result<()> {
    gray_preview(buf)?
        .save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn render_overlay(corrected: &PixelBuffer, lanes: &[Lane], bands: &[BandRoi]) -> Result<RgbImage> {
    let mut rgb = image::DynamicImage::ImageLuma8(gray_preview(corrected)?).to_rgb8();
    let last_row = corrected.height().saturating_sub(1);

    for lane in lanes.iter().filter(|l| l.width() > 0) {
        draw_rect(
            &mut rgb,
            lane.x0,
            0,
            lane.x1 - 1,
            last_row,
            Rgb([64, 160, 255]),
        );
    }
    for band in bands.iter().filter(|b| b.width() > 0 && b.height() > 0) {
        draw_rect(
            &mut rgb,
            band.x0,
            band.y0,
            band.x1 - 1,
            band.y1 - 1,
            Rgb([255, 64, 64]),
        );
    }

    Ok(rgb)
}

/// Outline of the inclusive box `[x0, x1] x [y0, y1]`, clipped to the image.
fn draw_rect(img: &mut RgbImage, x0: usize, y0: usize, x1: usize, y1: usize, color: Rgb<u8>) {
    for x in x0..=x1 {
        put_pixel_clipped(img, x, y0, color);
        put_pixel_clipped(img, x, y1, color);
    }
    for y in y0..=y1 {
        put_pixel_clipped(img, x0, y, color);
        put_pixel_clipped(img, x1, y, color);
    }
}

fn put_pixel_clipped(img: &mut RgbImage, x: usize, y: usize, color: Rgb<u8>) {
    let (Ok(ux), Ok(uy)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if ux >= img.width() || uy >= img.height() {
        return;
    }
    img.put_pixel(ux, uy, color);
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn write_chart_csv(path: PathBuf, points: &[ChartPoint]) -> Result<()> {
    let mut file =
        fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "lane,value").context("writing csv header")?;
    for p in points {
        writeln!(file, "{},{}", p.lane, round_to(p.value, 4)).context("writing csv row")?;
    }
    Ok(())
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
