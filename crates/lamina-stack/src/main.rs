//! lamina-stack: CLI for stacking images into one composite.
//!
//! Reads a batch of images, accumulates them per pixel channel, and
//! writes the mean or median composite as plain-text netpbm into the
//! output directory. Inputs that fail to decode or whose dimensions
//! disagree with the first accepted image are skipped with a warning;
//! the run only fails outright when nothing at all could be stacked or
//! the artifact cannot be written.
//!
//! # Usage
//!
//! ```text
//! lamina-stack [OPTIONS] [INPUTS]...
//! lamina-stack --count 12 --dir shots --mode median
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use lamina_core::{AcceptResult, ReduceMode, SampleCollector, SkipReason, StackConfig};

/// Stack same-size images into a per-pixel mean or median composite.
///
/// Inputs are given either as explicit paths or via `--count`, which
/// reads the fixed `<dir>/img<N>.jpg` naming convention. The composite
/// is written as ASCII PPM/PGM with the accepted-image count embedded
/// in the filename.
#[derive(Parser)]
#[command(name = "lamina-stack", version)]
struct Cli {
    /// Explicit input image paths (PNG, JPEG, BMP, WebP).
    inputs: Vec<PathBuf>,

    /// Read `<dir>/img1.jpg` through `<dir>/img<COUNT>.jpg` instead of
    /// explicit paths. Mutually exclusive with explicit paths.
    #[arg(long, value_name = "COUNT")]
    count: Option<String>,

    /// Directory holding the numbered inputs for --count.
    #[arg(long, default_value = "img")]
    dir: PathBuf,

    /// Reduction applied across the stack.
    #[arg(long, value_enum, default_value_t = Mode::Mean)]
    mode: Mode,

    /// Output directory (created if absent).
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Print a machine-readable JSON run summary to stdout.
    #[arg(long)]
    json: bool,

    /// Full stack config as a JSON string.
    ///
    /// When provided, `--mode` is ignored. The JSON must be a valid
    /// `StackConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Reduction mode selection.
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Per-pixel arithmetic mean, rounded half-up.
    Mean,
    /// Per-pixel upper median.
    Median,
}

/// Build a [`StackConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and
/// `--mode` is ignored. Otherwise the config is assembled from the
/// individual flags.
fn config_from_cli(cli: &Cli) -> Result<StackConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(StackConfig {
        mode: match cli.mode {
            Mode::Mean => ReduceMode::Mean,
            Mode::Median => ReduceMode::Median,
        },
    })
}

/// Resolve the ordered input path list from CLI arguments.
///
/// Exactly one of `--count` and explicit paths must be given. The
/// count must be a positive integer; violations are argument errors
/// that fail the run before any file is touched.
fn resolve_inputs(cli: &Cli) -> Result<Vec<PathBuf>, String> {
    match (&cli.count, cli.inputs.is_empty()) {
        (Some(_), false) => Err("pass either explicit paths or --count, not both".to_string()),
        (Some(raw), true) => {
            let count: usize = raw
                .parse()
                .map_err(|_| format!("image count must be a positive integer, got '{raw}'"))?;
            if count == 0 {
                return Err("image count must be greater than 0".to_string());
            }
            Ok((1..=count)
                .map(|i| cli.dir.join(format!("img{i}.jpg")))
                .collect())
        }
        (None, true) => Err("no inputs: pass image paths or --count".to_string()),
        (None, false) => Ok(cli.inputs.clone()),
    }
}

/// Write the artifact via a temporary sibling file and an atomic rename,
/// so a failed write never leaves a truncated file that looks complete.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("ppm.tmp");
    if let Err(error) = std::fs::write(&tmp, contents) {
        let _ = std::fs::remove_file(&tmp);
        return Err(error);
    }
    if let Err(error) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(error);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let inputs = match resolve_inputs(&cli) {
        Ok(paths) => paths,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let mut collector = SampleCollector::new(config.mode);
    let mut skipped: Vec<(PathBuf, SkipReason)> = Vec::new();

    for path in &inputs {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) => {
                let reason = SkipReason::DecodeFailed(error.to_string());
                eprintln!("Warning: skipping {}: {reason}", path.display());
                skipped.push((path.clone(), reason));
                continue;
            }
        };

        let sample = match lamina_core::decode::decode_sample(&bytes) {
            Ok(sample) => sample,
            Err(error) => {
                let reason = SkipReason::DecodeFailed(error.to_string());
                eprintln!("Warning: skipping {}: {reason}", path.display());
                skipped.push((path.clone(), reason));
                continue;
            }
        };

        match collector.accept(&sample) {
            Ok(AcceptResult::Accepted) => {}
            Ok(AcceptResult::ShapeMismatch { expected, actual }) => {
                let reason = SkipReason::ShapeMismatch { expected, actual };
                eprintln!("Warning: skipping {}: {reason}", path.display());
                skipped.push((path.clone(), reason));
            }
            Err(error) => {
                eprintln!("Error: {error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let accepted = collector.accepted();
    let composite = match collector.finish() {
        Ok(composite) => composite,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let text = match lamina_export::to_ppm(&composite) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = std::fs::create_dir_all(&cli.out_dir) {
        eprintln!(
            "Error creating output directory {}: {error}",
            cli.out_dir.display(),
        );
        return ExitCode::FAILURE;
    }

    let out_path = cli
        .out_dir
        .join(format!("{}{accepted}.ppm", config.mode.output_prefix()));
    if let Err(error) = write_atomic(&out_path, &text) {
        eprintln!("Error writing {}: {error}", out_path.display());
        return ExitCode::FAILURE;
    }

    if cli.json {
        let summary = serde_json::json!({
            "mode": config.mode,
            "accepted": accepted,
            "skipped": skipped
                .iter()
                .map(|(path, reason)| serde_json::json!({
                    "path": path.display().to_string(),
                    "reason": reason,
                }))
                .collect::<Vec<_>>(),
            "output": out_path.display().to_string(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(error) => {
                eprintln!("Error serializing summary: {error}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "Composite of {accepted} image{} written to {}",
            if accepted == 1 { "" } else { "s" },
            out_path.display(),
        );
        if !skipped.is_empty() {
            eprintln!("Skipped {} of {} inputs", skipped.len(), inputs.len());
        }
    }

    ExitCode::SUCCESS
}
