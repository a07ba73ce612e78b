// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk: scan a photographed document into a flat, clean page.
//
// Entry point. Initialises logging, loads settings, runs the scanner on one
// photo, and writes the results.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scanwerk_core::ScanConfig;
use scanwerk_core::error::Result;
use scanwerk_core::human_errors::{Severity, humanize_error};
use scanwerk_document::{DocumentScanner, ScanOutcome};

#[derive(Debug, Parser)]
#[command(name = "scanwerk")]
#[command(about = "Find the document in a photo, flatten it, and clean it up for archiving or OCR")]
#[command(version)]
struct Cli {
    /// Photo of the document (JPEG, PNG, TIFF, ...).
    input: PathBuf,

    /// Directory for the output images.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON settings file; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of the detected corners and transform.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Ignore outlines enclosing this many px² or fewer.
    #[arg(long)]
    min_area: Option<f64>,

    /// Width of the flattened page in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Height of the flattened page in pixels.
    #[arg(long)]
    height: Option<u32>,
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Scanned,
    NoDocument,
}

/// Settings file (if any) with command-line overrides applied on top.
fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(min_area) = cli.min_area {
        config.selection.min_contour_area = min_area;
    }
    if let Some(width) = cli.width {
        config.rectify.width = width;
    }
    if let Some(height) = cli.height {
        config.rectify.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<RunStatus> {
    let config = build_config(cli)?;
    let scanner = DocumentScanner::open(&cli.input, config)?;

    match scanner.scan()? {
        ScanOutcome::NoDocument { min_area } => {
            tracing::warn!(min_area, "No document found");
            Ok(RunStatus::NoDocument)
        }
        ScanOutcome::Scanned(result) => {
            let stem = cli
                .input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scan".to_string());
            let files = output::write_images(&cli.out_dir, &stem, &result)?;
            if let Some(report) = &cli.report {
                output::write_report(report, &result)?;
            }
            tracing::info!(
                scanned = %files.rectified.display(),
                cleaned = %files.binarized.display(),
                "Scan saved"
            );
            Ok(RunStatus::Scanned)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(input = %cli.input.display(), "Scanwerk starting");

    match run(&cli) {
        Ok(RunStatus::Scanned) => {
            println!("Document scanned successfully!");
            ExitCode::SUCCESS
        }
        Ok(RunStatus::NoDocument) => {
            println!("No document found. Try a background with higher contrast.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Scan failed");
            let human = humanize_error(&err);
            eprintln!("{} {}", human.message, human.suggestion);
            match human.severity {
                Severity::Notice => ExitCode::SUCCESS,
                Severity::ActionRequired => ExitCode::from(2),
                Severity::Permanent => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use scanwerk_core::ScanwerkError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scanwerk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn input_path_is_required() {
        assert!(Cli::try_parse_from(["scanwerk"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["photo.jpg", "--min-area", "1200", "--width", "800"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.selection.min_contour_area, 1200.0);
        assert_eq!(config.rectify.width, 800);
        assert_eq!(config.rectify.height, 1414);
    }

    #[test]
    fn zero_width_is_rejected() {
        let cli = parse(&["photo.jpg", "--width", "0"]);
        assert!(matches!(
            build_config(&cli),
            Err(ScanwerkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(
            &settings,
            r#"{ "selection": { "min_contour_area": 900.0 }, "rectify": { "height": 700 } }"#,
        )
        .unwrap();

        let cli = parse(&[
            "photo.jpg",
            "--config",
            settings.to_str().unwrap(),
            "--min-area",
            "300",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.selection.min_contour_area, 300.0);
        assert_eq!(config.rectify.height, 700);
    }

    #[test]
    fn missing_photo_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&[dir.path().join("nope.jpg").to_str().unwrap()]);
        assert!(matches!(run(&cli), Err(ScanwerkError::LoadFailure(_))));
    }

    #[test]
    fn blank_photo_reports_no_document() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("blank.png");
        RgbImage::new(120, 90).save(&photo).unwrap();

        let out_dir = dir.path().join("out");
        let cli = parse(&[
            photo.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
        ]);
        assert_eq!(run(&cli).unwrap(), RunStatus::NoDocument);
        assert!(!out_dir.exists());
    }

    #[test]
    fn page_photo_is_scanned_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("page.png");
        let mut img = RgbImage::new(320, 420);
        for y in 40..380 {
            for x in 30..290 {
                img.put_pixel(x, y, Rgb([250, 250, 250]));
            }
        }
        img.save(&photo).unwrap();

        let out_dir = dir.path().join("out");
        let report = dir.path().join("report.json");
        let cli = parse(&[
            photo.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ]);
        assert_eq!(run(&cli).unwrap(), RunStatus::Scanned);
        assert!(out_dir.join("page-scanned.png").exists());
        assert!(out_dir.join("page-cleaned.png").exists());
        assert!(out_dir.join("page-original.png").exists());
        assert!(report.exists());
    }
}
