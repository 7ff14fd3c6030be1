//! Command-line interface definitions.

use amp_optimizer::TransformerId;
use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Server-side AMP HTML optimizer
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTML files or directories to optimize.
    /// Reads stdin when omitted or when a path is `-`.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Config file path (default: amp-optimizer.toml, if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output directory. Without it the single result goes to stdout.
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Run these transformers in this order; the rest keep their
    /// default position (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub transformers: Option<Vec<TransformerId>>,

    /// Override `max_css_byte_count`
    #[arg(long, value_name = "BYTES")]
    pub max_css_bytes: Option<usize>,

    /// Write the unoptimized input when optimization fails
    #[arg(long)]
    pub fallback: bool,

    /// Write collected diagnostics as JSON to this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
