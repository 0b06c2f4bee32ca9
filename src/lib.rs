//! Kortext: preprocessing for Korean text OCR datasets.
//!
//! Kortext turns per-image JSON annotation documents into plain-text
//! ground-truth files (one quadrilateral and transcription per line), writes
//! image list manifests for train/test folders, and splits a raw image +
//! label corpus into train/test directories.
//!
//! # Modules
//!
//! - [`document`]: Annotation document types and JSON reader
//! - [`convert`]: Ground-truth conversion and its diagnostics
//! - [`manifest`]: Image list manifests
//! - [`split`]: Deterministic train/test splitting
//! - [`error`]: Error types for kortext operations

pub mod convert;
pub mod document;
pub mod error;
pub mod manifest;
pub mod split;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use error::KortextError;

/// The kortext CLI application.
#[derive(Parser)]
#[command(name = "kortext")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Dataset root from which default paths are derived.
    #[arg(long, global = true, env = "KORTEXT_ROOT", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert annotation documents into ground-truth text files.
    Convert(ConvertArgs),
    /// Write train/test image list manifests.
    List(ListArgs),
    /// Split the origin corpus into train/test directories.
    Split(SplitArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory of training annotation documents [default: <root>/train_labels].
    #[arg(long)]
    train_label_path: Option<PathBuf>,

    /// Directory of test annotation documents [default: <root>/test_labels].
    #[arg(long)]
    test_label_path: Option<PathBuf>,

    /// Output directory for training ground truth [default: <root>/train_gts].
    #[arg(long)]
    train_output_dir: Option<PathBuf>,

    /// Output directory for test ground truth [default: <root>/test_gts].
    #[arg(long)]
    test_output_dir: Option<PathBuf>,

    /// Write transcriptions verbatim instead of CSV-quoting them.
    #[arg(long)]
    raw_text: bool,

    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Directory of training images [default: <root>/train_images].
    #[arg(long)]
    train_image_path: Option<PathBuf>,

    /// Directory of test images [default: <root>/test_images].
    #[arg(long)]
    test_image_path: Option<PathBuf>,

    /// Where train_list.txt and test_list.txt are written [default: <root>].
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Directory of origin images [default: <root>/origin_images].
    #[arg(long)]
    origin_image_path: Option<PathBuf>,

    /// Directory of origin label documents [default: <root>/origin_labels].
    #[arg(long)]
    origin_label_path: Option<PathBuf>,

    /// [default: <root>/train_images]
    #[arg(long)]
    train_image_path: Option<PathBuf>,

    /// [default: <root>/train_labels]
    #[arg(long)]
    train_label_path: Option<PathBuf>,

    /// [default: <root>/test_images]
    #[arg(long)]
    test_image_path: Option<PathBuf>,

    /// [default: <root>/test_labels]
    #[arg(long)]
    test_label_path: Option<PathBuf>,

    /// Fraction of images assigned to the test split.
    #[arg(long, default_value_t = 0.25)]
    test_size: f64,

    /// Seed for the shuffle.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn or_root(path: Option<PathBuf>, root: &Path, default: &str) -> PathBuf {
    path.unwrap_or_else(|| root.join(default))
}

/// Run the kortext CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), KortextError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(&cli.root, args),
        Some(Commands::List(args)) => run_list(&cli.root, args),
        Some(Commands::Split(args)) => run_split(&cli.root, args),
        None => {
            println!("kortext {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Ground truth, manifests and splits for Korean text OCR datasets.");
            println!();
            println!("Run 'kortext --help' for usage information.");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ConvertOutput {
    train: convert::BatchSummary,
    test: convert::BatchSummary,
}

/// Execute the convert subcommand.
fn run_convert(root: &Path, args: ConvertArgs) -> Result<(), KortextError> {
    let train_labels = or_root(args.train_label_path, root, "train_labels");
    let test_labels = or_root(args.test_label_path, root, "test_labels");
    let train_out = or_root(args.train_output_dir, root, "train_gts");
    let test_out = or_root(args.test_output_dir, root, "test_gts");

    let opts = convert::ConvertOptions {
        encoding: if args.raw_text {
            convert::TextEncoding::Raw
        } else {
            convert::TextEncoding::Quoted
        },
    };

    let mut sink = convert::LogSink;
    let train = convert::convert_dir(&train_labels, &train_out, &opts, &mut sink)?;
    let test = convert::convert_dir(&test_labels, &test_out, &opts, &mut sink)?;
    log::debug!("conversion completed");

    let output = ConvertOutput { train, test };
    match args.output {
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&output).map_err(KortextError::ReportSerialize)?;
            println!("{}", json);
        }
        ReportFormat::Text => {
            println!("Converted {} -> {}", train_labels.display(), train_out.display());
            print!("{}", output.train);
            println!("Converted {} -> {}", test_labels.display(), test_out.display());
            print!("{}", output.test);
        }
    }

    let failed = output.train.failed.len() + output.test.failed.len();
    if failed > 0 {
        return Err(KortextError::ConversionFailed {
            failed,
            total: output.train.documents + output.test.documents,
        });
    }
    Ok(())
}

/// Execute the list subcommand.
fn run_list(root: &Path, args: ListArgs) -> Result<(), KortextError> {
    let train_images = or_root(args.train_image_path, root, "train_images");
    let test_images = or_root(args.test_image_path, root, "test_images");
    let output_dir = args.output_dir.unwrap_or_else(|| root.to_path_buf());

    log::debug!("train image path: {}", train_images.display());
    log::debug!("test image path: {}", test_images.display());

    let train_count = manifest::write_manifest(&train_images, &output_dir.join("train_list.txt"))?;
    let test_count = manifest::write_manifest(&test_images, &output_dir.join("test_list.txt"))?;

    println!("Listed {} training image(s) in train_list.txt", train_count);
    println!("Listed {} test image(s) in test_list.txt", test_count);
    Ok(())
}

/// Execute the split subcommand.
fn run_split(root: &Path, args: SplitArgs) -> Result<(), KortextError> {
    let layout = split::SplitLayout {
        origin_image_dir: or_root(args.origin_image_path, root, "origin_images"),
        origin_label_dir: or_root(args.origin_label_path, root, "origin_labels"),
        train_image_dir: or_root(args.train_image_path, root, "train_images"),
        train_label_dir: or_root(args.train_label_path, root, "train_labels"),
        test_image_dir: or_root(args.test_image_path, root, "test_images"),
        test_label_dir: or_root(args.test_label_path, root, "test_labels"),
    };
    let opts = split::SplitOptions {
        test_size: args.test_size,
        seed: args.seed,
    };

    let report = split::split_dataset(&layout, &opts)?;

    println!(
        "Split {} image(s): {} train, {} test",
        report.train_images + report.test_images,
        report.train_images,
        report.test_images
    );
    println!(
        "Copied {} label(s), {} missing",
        report.labels_copied,
        report.missing_labels.len()
    );
    Ok(())
}
