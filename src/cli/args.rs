//! Command line argument parsing for the occucode CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifyOptions;

/// occucode - classify noisy job titles into an occupational taxonomy
#[derive(Parser, Debug, Clone)]
#[command(name = "occucode")]
#[command(about = "Classify noisy Chinese job titles into an occupational taxonomy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct OccucodeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the taxonomy and alias tables
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl OccucodeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Normalize job titles without classifying them
    Clean(CleanArgs),

    /// Classify a single job title
    Classify(ClassifyArgs),

    /// Classify every title in a file
    Batch(BatchArgs),

    /// Build the reference index of a taxonomy version and report on it
    #[command(name = "index-info")]
    IndexInfo(IndexInfoArgs),
}

/// Arguments for normalizing titles
#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Titles to normalize
    #[arg(value_name = "TITLE")]
    pub titles: Vec<String>,

    /// Read additional titles from a file, one per line
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Matching options shared by the classifying commands.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Number of matches per title (0 returns all)
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Minimum similarity a match needs
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Map weak matches to coarser codes
    #[arg(long)]
    pub hierarchical: bool,

    /// Taxonomy version (defaults to the configured one)
    #[arg(long, value_name = "VERSION")]
    pub taxonomy: Option<String>,
}

impl MatchArgs {
    /// Apply command line overrides on top of configured options.
    pub fn apply(&self, mut options: ClassifyOptions) -> ClassifyOptions {
        if let Some(top_n) = self.top_n {
            options.top_n = Some(top_n);
        }
        if let Some(threshold) = self.threshold {
            options.threshold = Some(threshold);
        }
        if self.hierarchical {
            options.hierarchical = true;
        }
        if let Some(version) = &self.taxonomy {
            options.version = Some(version.clone());
        }
        options
    }
}

/// Arguments for classifying one title
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// The job title
    #[arg(value_name = "TITLE")]
    pub title: String,

    #[command(flatten)]
    pub matching: MatchArgs,
}

/// Arguments for classifying a file of titles
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Input file: plain text (one title per line), CSV or JSON
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// CSV column holding the titles (default: the first column)
    #[arg(long)]
    pub column: Option<String>,

    /// Titles embedded per provider call
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Nest matches under each input instead of one row per match
    #[arg(long)]
    pub grouped: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub matching: MatchArgs,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct IndexInfoArgs {
    /// Taxonomy version (defaults to the configured one)
    #[arg(long, value_name = "VERSION")]
    pub taxonomy: Option<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}
