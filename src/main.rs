use std::env;
use std::path::PathBuf;

use haar_detector::image::{load_rgba_image, write_json_file};
use haar_detector::{Cascade, DetectorParams, HaarDetector};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "haar_demo".to_string());
    let config = parse_args(&program)?;

    let frame = load_rgba_image(&config.input_path)
        .map_err(|e| format!("Failed to load {}: {e}", config.input_path.display()))?;

    let params = DetectorParams {
        edges_density: config.edges_density,
        ..Default::default()
    };
    let cascade = brightness_cascade(config.window as f64, config.min_luminance)?;
    let detector = HaarDetector::new(params).map_err(|e| e.to_string())?;
    let report = detector.detect_with_diagnostics(frame.as_view(), &cascade);

    if config.format.includes_text() {
        println!(
            "{}x{}: {} detections from {} candidates ({} windows evaluated, {} pruned) in {:.3} ms",
            report.trace.input.width,
            report.trace.input.height,
            report.detections.len(),
            report.trace.scan.candidates,
            report.trace.scan.windows_evaluated,
            report.trace.scan.windows_pruned,
            report.trace.timings.total_ms,
        );
        for d in &report.detections {
            println!(
                "  {}x{} at ({}, {}), {} raw hits",
                d.width, d.height, d.x, d.y, d.total
            );
        }
    }

    if config.format.includes_json() {
        if let Some(path) = &config.json_out {
            write_json_file(path, &report)
                .map_err(|e| format!("Failed to write JSON report to {}: {e}", path.display()))?;
            println!("JSON report written to {}", path.display());
        } else {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Toy single-stage cascade firing on bright, low-variance windows. Stands
/// in for a trained cascade so the pipeline can be exercised end-to-end.
fn brightness_cascade(base: f64, threshold: f64) -> Result<Cascade, String> {
    Cascade::from_values(vec![
        base, base, //
        0.5, 1.0, //
        0.0, 1.0, //
        0.0, 0.0, base, base, 1.0, //
        threshold, 0.0, 1.0, //
    ])
    .map_err(|e| e.to_string())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Both,
}

impl OutputFormat {
    fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

struct Config {
    input_path: PathBuf,
    json_out: Option<PathBuf>,
    format: OutputFormat,
    window: u32,
    min_luminance: f64,
    edges_density: f64,
}

fn parse_args(program: &str) -> Result<Config, String> {
    let mut input_path = None;
    let mut json_out = None;
    let mut format = OutputFormat::Text;
    let mut window = 16u32;
    let mut min_luminance = 160.0f64;
    let mut edges_density = 0.0f64;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => format = OutputFormat::Json,
            "--both" => format = OutputFormat::Both,
            "--json-out" => {
                let path = args.next().ok_or("--json-out requires a path")?;
                json_out = Some(PathBuf::from(path));
                if format == OutputFormat::Text {
                    format = OutputFormat::Both;
                }
            }
            "--window" => {
                let value = args.next().ok_or("--window requires a size")?;
                window = value
                    .parse()
                    .map_err(|_| format!("Invalid window size: {value}"))?;
            }
            "--min-luminance" => {
                let value = args.next().ok_or("--min-luminance requires a value")?;
                min_luminance = value
                    .parse()
                    .map_err(|_| format!("Invalid luminance: {value}"))?;
            }
            "--edges-density" => {
                let value = args.next().ok_or("--edges-density requires a value")?;
                edges_density = value
                    .parse()
                    .map_err(|_| format!("Invalid density: {value}"))?;
            }
            "--help" | "-h" => {
                print_usage(program);
                std::process::exit(0);
            }
            other if input_path.is_none() && !other.starts_with('-') => {
                input_path = Some(PathBuf::from(other));
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    let input_path = input_path.ok_or_else(|| {
        print_usage(program);
        "missing input image".to_string()
    })?;

    Ok(Config {
        input_path,
        json_out,
        format,
        window,
        min_luminance,
        edges_density,
    })
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {program} <image> [--json | --both] [--json-out PATH] \
         [--window N] [--min-luminance V] [--edges-density D]\n\n\
         Scans the image with a demo brightness cascade and reports the\n\
         merged detections with per-stage timings."
    );
}
