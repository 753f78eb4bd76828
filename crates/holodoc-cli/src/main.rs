// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// holodoc CLI: run either document detector on an image file and print the
// result as JSON.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use holodoc_core::config::MAX_DOCUMENTS;
use holodoc_core::{BACKGROUND_DEFAULT, Color, DetectorConfig, Document, PALETTE, StatusCode};
use holodoc_detect::{Frame, detect_documents, detect_with_overlay};
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "holodoc")]
#[command(about = "Find rectangular documents lying on a uniform background")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect documents against a known background colour.
    Detect(DetectArgs),

    /// Detect quadrilaterals by polygon approximation and draw them.
    Overlay(OverlayArgs),

    /// List the named background colours.
    Palette,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Background colour: a palette name or "r,g,b".
    #[arg(long, default_value = "black")]
    background: String,

    /// Per-channel tolerance around the background colour.
    #[arg(long)]
    tolerance: Option<u8>,

    /// Detector configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct OverlayArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Maximum number of documents to report.
    #[arg(long, default_value_t = MAX_DOCUMENTS)]
    max: usize,

    /// Path to write the annotated image.
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Detector configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

/// JSON report printed to stdout.
#[derive(Debug, Serialize)]
struct Report {
    strategy: &'static str,
    width: u32,
    height: u32,
    status: i32,
    message: &'static str,
    documents: Vec<Document>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => {
            let report = run_detect(&args)?;
            print_report(&report)
        }
        Commands::Overlay(args) => {
            let report = run_overlay(&args)?;
            print_report(&report)
        }
        Commands::Palette => run_palette(),
    }
}

fn print_report(report: &Report) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<DetectorConfig> {
    match path {
        Some(path) => Ok(DetectorConfig::load(path)?),
        None => Ok(DetectorConfig::default()),
    }
}

fn parse_background(spec: &str) -> CliResult<Color> {
    Color::parse(spec).ok_or_else(|| -> CliError {
        format!("unknown background colour '{spec}' (use a palette name or r,g,b)").into()
    })
}

// ── detect ────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> CliResult<Report> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(tolerance) = args.tolerance {
        config.color_tolerance = tolerance;
    }
    let background = parse_background(&args.background)?;

    tracing::info!("Loading image: {}", args.image.display());
    let frame = Frame::open(&args.image)?;

    let result = detect_documents(&frame, background, &config);
    let status = StatusCode::from_result(&result);
    let documents = match result {
        Ok(docs) => docs,
        Err(err) if err.status() == StatusCode::NoDocumentsFound => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    Ok(Report {
        strategy: "corners",
        width: frame.width(),
        height: frame.height(),
        status: status.code(),
        message: status.describe(),
        documents,
    })
}

// ── overlay ───────────────────────────────────────────────────────────

fn run_overlay(args: &OverlayArgs) -> CliResult<Report> {
    let config = load_config(args.config.as_deref())?;

    tracing::info!("Loading image: {}", args.image.display());
    let frame = Frame::open(&args.image)?;

    let detection = detect_with_overlay(&frame, args.max, &config)?;
    if let Some(path) = &args.annotated {
        Frame::from_rgb(detection.overlay).save(path)?;
        tracing::info!("Annotated image written to {}", path.display());
    }

    let status = if detection.documents.is_empty() {
        StatusCode::NoDocumentsFound
    } else {
        StatusCode::Ok
    };
    Ok(Report {
        strategy: "polygon",
        width: frame.width(),
        height: frame.height(),
        status: status.code(),
        message: status.describe(),
        documents: detection.documents,
    })
}

// ── palette ───────────────────────────────────────────────────────────

fn run_palette() -> CliResult<()> {
    for (name, color) in PALETTE {
        let marker = if color == BACKGROUND_DEFAULT { " (default)" } else { "" };
        println!("  {:<12} {:>3},{:>3},{:>3}{}", name, color.r, color.g, color.b, marker);
    }
    Ok(())
}
