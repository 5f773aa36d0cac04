//! Headless region-ocr driver.
//!
//! Replays a gesture script against the annotation engine and prints the
//! resulting export to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use region_ocr::app::Annotator;
use region_ocr::config::{AppConfig, init_logging};
use region_ocr::ocr::DisabledEngine;
use region_ocr::replay::Script;

/// region-ocr - replay a gesture script and print the annotation export
#[derive(Parser, Debug)]
#[command(name = "region-ocr")]
#[command(about = "Replay a region annotation script and print the export")]
struct Args {
    /// Gesture script (JSON); image paths are relative to its directory
    script: PathBuf,

    /// Configuration file; defaults are used when absent
    #[arg(long, env = "REGION_OCR_CONFIG")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> AppConfig {
    let Some(path) = path else {
        return AppConfig::default();
    };
    match AppConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring config {}: {}", path.display(), e);
            AppConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = load_config(args.config.as_deref());
    init_logging(config.preferences.log_level);

    let script = match Script::load(&args.script) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.script.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let base_dir = args.script.parent().unwrap_or(Path::new("."));

    // No recognizer ships with the driver; OCR dispatches are skipped.
    let mut app = Annotator::new(config, DisabledEngine);
    match script.run(&mut app, base_dir) {
        Ok(export) => {
            print!("{}", export);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
