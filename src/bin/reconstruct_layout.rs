//! Reconstruct paragraph layout from scanned pages
//!
//! Reads page rasters (or previously saved page records), rebuilds the
//! document's paragraphs and writes them as JSON. Text lines are found with
//! tesseract by default; `--detector marked` reads rectangles already drawn
//! on the pages instead.
//!
//! Usage:
//!   reconstruct_layout pages scans/contract --output paragraphs.json
//!   reconstruct_layout pages scans/contract --workspace runs --lang rus
//!   reconstruct_layout pages marked/contract --detector marked
//!   reconstruct_layout records runs/exp_3/records
//!
//! Logging follows `RUST_LOG`; `-v` raises the default level to debug.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use layout_oxide::ocr::{
    MarkedRegionDetector, RegionDetector, TesseractCli, TesseractLineDetector,
};
use layout_oxide::pipeline::{
    load_page_images, reconstruct_document, LayoutPipeline, PageRecordStore, RunWorkspace,
};
use layout_oxide::{LayoutConfig, Paragraph, Result};

/// Reconstruct paragraph layout from scanned, line-marked pages
#[derive(Parser, Debug)]
#[command(name = "reconstruct_layout")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Write paragraphs JSON here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// OCR language hint (overrides the configuration)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// How text regions are found on a page
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DetectorKind {
    /// Tesseract text lines on unmarked scans
    Lines,
    /// Green rectangles already drawn on the pages
    Marked,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a directory of page rasters
    Pages {
        /// Directory with page_<N>.png / .jpg files
        dir: PathBuf,

        /// Keep page records in a fresh exp_<n> workspace under this directory
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Path of the tesseract executable
        #[arg(long, default_value = "tesseract")]
        tesseract: PathBuf,

        /// Region detector
        #[arg(short, long, value_enum, default_value_t = DetectorKind::Lines)]
        detector: DetectorKind,
    },
    /// Concatenate saved processed_page_<N>.json records
    Records {
        /// Directory holding the records
        dir: PathBuf,
    },
}

fn load_config(args: &Args) -> Result<LayoutConfig> {
    let mut config = match &args.config {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::default(),
    };
    if let Some(lang) = &args.lang {
        config.ocr_language = lang.clone();
    }
    config.validate()?;
    Ok(config)
}

fn process_pages(
    config: LayoutConfig,
    dir: &Path,
    workspace: Option<&Path>,
    tesseract: &Path,
    detector: DetectorKind,
) -> Result<Vec<Paragraph>> {
    match detector {
        DetectorKind::Lines => {
            let cli = TesseractCli::with_binary(tesseract);
            let lines = TesseractLineDetector::new(cli, config.ocr_language.clone())
                .with_expansion(config.line_expansion);
            run_pipeline(config, lines, dir, workspace, tesseract)
        },
        DetectorKind::Marked => {
            let marked = MarkedRegionDetector::new(config.min_region_side);
            run_pipeline(config, marked, dir, workspace, tesseract)
        },
    }
}

fn run_pipeline(
    config: LayoutConfig,
    detector: impl RegionDetector + 'static,
    dir: &Path,
    workspace: Option<&Path>,
    tesseract: &Path,
) -> Result<Vec<Paragraph>> {
    let pages = load_page_images(dir)?;
    log::info!("Loaded {} pages from {}", pages.len(), dir.display());

    let engine = TesseractCli::with_binary(tesseract);
    let mut pipeline = LayoutPipeline::new(config, detector, engine)?;

    if let Some(base) = workspace {
        let run = RunWorkspace::create_next(base)?;
        pipeline = pipeline.with_workspace(run);
    }

    pipeline.process_pages(&pages)
}

fn process_records(config: &LayoutConfig, dir: &Path) -> Result<Vec<Paragraph>> {
    let blocks = PageRecordStore::new(dir).concatenate(config.page_break_gap)?;
    Ok(reconstruct_document(blocks, config))
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;

    let paragraphs = match &args.command {
        Command::Pages {
            dir,
            workspace,
            tesseract,
            detector,
        } => process_pages(config, dir, workspace.as_deref(), tesseract, *detector)?,
        Command::Records { dir } => process_records(&config, dir)?,
    };
    log::info!("Reconstructed {} paragraphs", paragraphs.len());

    let json = serde_json::to_string_pretty(&paragraphs)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        },
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
