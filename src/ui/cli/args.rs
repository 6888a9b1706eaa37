use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::tasks::TraceFormat;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Interactive and scripted runner for nabor classification sessions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a dataset snapshot from labelled examples
    Train(TrainArgs),
    /// Print one prediction per frame of a frame file
    Classify(ClassifyArgs),
    /// Drive a cursor session over a frame file, with a live status line
    Control(ControlArgs),
    /// Synthetic end-to-end session, no files needed
    Demo(DemoArgs),
    /// Show a dataset's dimensionality and per-class example counts
    Info(InfoArgs),
    /// Print the JSON schema of the dataset file format
    Schema,
}

/// Trace dump format flag (maps onto [`TraceFormat`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl From<DumpFormat> for TraceFormat {
    fn from(value: DumpFormat) -> Self {
        match value {
            DumpFormat::Csv => TraceFormat::Csv,
            DumpFormat::Tsv => TraceFormat::Tsv,
            DumpFormat::Json => TraceFormat::Json,
        }
    }
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Labelled example file, one `label,v1,v2,...` per line
    #[arg(
        long,
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        required_unless_present = "synthetic",
        conflicts_with = "synthetic"
    )]
    pub examples: Option<PathBuf>,

    /// Draw synthetic training examples instead of reading a file
    #[arg(long)]
    pub synthetic: bool,

    /// Comma-separated labels for the synthetic clusters
    #[arg(long, value_name = "LABELS", default_value = "Left,Right,Up,Down,Stop")]
    pub labels: String,

    /// Examples drawn per synthetic label
    #[arg(
        long,
        default_value_t = 20,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub examples_per_label: u64,

    /// Dimensionality of synthetic feature vectors
    #[arg(
        long,
        default_value_t = 16,
        value_name = "D",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub dimensions: u64,

    /// Noise half-width around each synthetic centroid
    #[arg(long, default_value_t = 0.5, value_name = "X")]
    pub noise: f64,

    /// PRNG seed for the synthetic generator
    #[arg(long, default_value_t = 42, value_name = "SEED")]
    pub seed: u64,

    /// Where to write the dataset snapshot
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Dataset snapshot to classify against
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dataset: PathBuf,

    /// Frame file, one comma-separated vector per line
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub frames: PathBuf,

    /// Neighbors consulted per prediction
    #[arg(
        short,
        long,
        default_value_t = 3,
        value_name = "K",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub k: u64,
}

/// Options shared by every live session (file-fed or synthetic).
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Neighbors consulted per prediction
    #[arg(
        short,
        long,
        default_value_t = 3,
        value_name = "K",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub k: u64,

    /// Width of the cursor plane
    #[arg(long, default_value_t = 800.0, value_name = "W")]
    pub width: f64,

    /// Height of the cursor plane
    #[arg(long, default_value_t = 600.0, value_name = "H")]
    pub height: f64,

    /// Cursor step per recognized direction label
    #[arg(long, default_value_t = 5.0, value_name = "S")]
    pub step: f64,

    /// Track focus zoom: shrink while this label wins, grow otherwise
    #[arg(long, value_name = "LABEL")]
    pub distraction_label: Option<String>,

    /// Stop after this many frames (omit to drain the source)
    #[arg(long, value_name = "N")]
    pub max_frames: Option<u64>,

    /// File to dump the session trace after completion
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub trace_file: Option<PathBuf>,

    /// Format for the trace file
    #[arg(long, value_name = "FORMAT", value_enum, default_value = "csv")]
    pub trace_format: DumpFormat,
}

#[derive(Debug, Args)]
pub struct ControlArgs {
    /// Dataset snapshot to classify against
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dataset: PathBuf,

    /// Frame file, one comma-separated vector per line
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub frames: PathBuf,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Comma-separated labels for the synthetic clusters
    #[arg(long, value_name = "LABELS", default_value = "Left,Right,Up,Down,Stop")]
    pub labels: String,

    /// Examples drawn per label before the session starts
    #[arg(
        long,
        default_value_t = 20,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub examples_per_label: u64,

    /// Dimensionality of synthetic feature vectors
    #[arg(
        long,
        default_value_t = 16,
        value_name = "D",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub dimensions: u64,

    /// Noise half-width around each synthetic centroid
    #[arg(long, default_value_t = 0.5, value_name = "X")]
    pub noise: f64,

    /// PRNG seed for the synthetic generator
    #[arg(long, default_value_t = 42, value_name = "SEED")]
    pub seed: u64,

    /// Frames to stream through the session
    #[arg(
        long,
        default_value_t = 200,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub frames: u64,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Dataset snapshot to inspect
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dataset: PathBuf,
}
