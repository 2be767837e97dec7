use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use logoscout_core::detection::infrastructure::device::Device;
use logoscout_core::detection::infrastructure::model_resolver::WeightsSource;
use logoscout_core::detection::infrastructure::registry;
use logoscout_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use logoscout_core::pipeline::detect_image_use_case::{DetectImageUseCase, DetectionReport};
use logoscout_core::shared::constants::{DEFAULT_MIN_CONFIDENCE, IMAGE_EXTENSIONS};

/// Logo detection for images.
#[derive(Parser)]
#[command(name = "logoscout")]
struct Cli {
    /// Input image files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Detection algorithm from the built-in registry.
    #[arg(long, default_value = "faster_rcnn")]
    algorithm: String,

    /// Compute device: cpu, coreml, or directml.
    #[arg(long, default_value = "cpu")]
    device: String,

    /// Weights file path or published pretrained weights name
    /// (defaults to the algorithm's published weights).
    #[arg(long)]
    weights: Option<String>,

    /// Minimum detection confidence, exclusive (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    confidence: f32,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let device: Device = cli.device.parse()?;
    let weights = cli.weights.as_deref().map(WeightsSource::parse);
    let detector = registry::build_detector(
        &cli.algorithm,
        &device,
        weights,
        cli.confidence,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    let mut use_case = DetectImageUseCase::new(Box::new(ImageFileReader::new()), detector);

    let mut reports: Vec<DetectionReport> = Vec::new();
    for input in &cli.inputs {
        let report = use_case.execute(input)?;
        log::info!(
            "{}: {} detection(s) above threshold",
            input.display(),
            report.detections.len()
        );
        reports.push(report);
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if !is_image(input) {
            return Err(format!("Unsupported image type: {}", input.display()).into());
        }
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading detection weights... {pct}%");
    } else {
        eprint!("\rDownloading detection weights... {downloaded} bytes");
    }
}
