//! Pagemask: PAGE XML text-line annotations to binary segmentation masks.
//!
//! For every `*.xml` annotation file in an input directory, pagemask draws
//! the annotated text-line polygons onto a black canvas the size of the page
//! (white interiors, 4 px black outlines) and writes the result as
//! `<stem>.png` in an output directory. Files are processed in parallel.
//!
//! # Modules
//!
//! - [`pagexml`]: PAGE XML reading (page metadata and text-line polygons)
//! - [`raster`]: Polygon fill and stroke into an RGB mask
//! - [`discovery`]: Input directory scanning and annotation/image pairing
//! - [`writer`]: PNG mask output
//! - [`convert`]: Parallel batch orchestration, progress and summary
//! - [`error`]: Error types for pagemask operations

pub mod convert;
pub mod discovery;
pub mod error;
pub mod pagexml;
pub mod raster;
pub mod writer;

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

pub use convert::{convert, ConversionSummary, ConvertOptions};
pub use error::PageMaskError;

/// The pagemask CLI application.
#[derive(Parser)]
#[command(name = "pagemask")]
#[command(version, about)]
struct Cli {
    /// Input directory containing PAGE XML files and their page images.
    #[arg(
        short = 'i',
        long = "InputDir",
        env = "PAGEMASK_INPUT_DIR",
        default_value = convert::DEFAULT_INPUT_DIR
    )]
    input_dir: PathBuf,

    /// Output directory for the binary mask PNGs.
    #[arg(
        short = 'o',
        long = "OutputDir",
        env = "PAGEMASK_OUTPUT_DIR",
        default_value = convert::DEFAULT_OUTPUT_DIR
    )]
    output_dir: PathBuf,

    /// Delete and recreate the output directory before converting.
    #[arg(
        short = 'd',
        long = "DeletePrevious",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    delete_previous: bool,

    /// Number of worker threads (default: available parallelism).
    #[arg(
        short = 'j',
        long,
        env = "PAGEMASK_JOBS",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    jobs: Option<u16>,

    /// Summary format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Do not draw the progress bar.
    #[arg(long)]
    no_progress: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the pagemask CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PageMaskError> {
    let cli = Cli::parse();

    let options = ConvertOptions {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        delete_previous: cli.delete_previous,
        jobs: cli.jobs.map(usize::from),
        show_progress: !cli.no_progress,
    };

    let summary = convert(&options)?;

    match cli.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        ReportFormat::Text => print!("{}", summary),
    }

    Ok(())
}
