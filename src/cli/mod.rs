pub mod setup;

use crate::io::output::OutputFormat;
use crate::scoring::{DispersionConfig, PenaltyStep, PenaltyTable, ScoreError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compdisp")]
#[command(about = "Comparable-sale price dispersion scorer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the dispersion of a comparable set
    Score {
        /// JSON file with comparables ("-" for stdin)
        input: PathBuf,

        /// Configuration file (defaults to discovering .compdisp.toml)
        #[arg(short, long, env = "COMPDISP_CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: ScoringOverrides,

        /// Output format (defaults to the config file's choice)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print full-precision figures instead of display rounding
        #[arg(long)]
        raw: bool,
    },

    /// Build valuation-quality sections for one property or a batch
    Section {
        /// Property JSON, single object or {"results": [...]} ("-" for stdin)
        input: PathBuf,

        /// Configuration file (defaults to discovering .compdisp.toml)
        #[arg(short, long, env = "COMPDISP_CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: ScoringOverrides,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads for batch input (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,
    },

    /// Score the built-in sample comparables with and without an outlier
    Demo {
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Write a default .compdisp.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Scorer parameters that take precedence over the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScoringOverrides {
    /// Decay constant for the dispersion score
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Minimum size for a comparable to count
    #[arg(long = "size-floor")]
    pub size_floor: Option<f64>,

    /// Penalty step THRESHOLD:MULTIPLIER; repeat to build a table
    #[arg(long = "penalty", value_name = "THRESHOLD:MULTIPLIER")]
    pub penalties: Vec<PenaltyStep>,

    /// Disable penalty steps entirely
    #[arg(long = "no-penalties", conflicts_with = "penalties")]
    pub no_penalties: bool,
}

impl ScoringOverrides {
    /// Layer these flags over `config`. The result is validated.
    pub fn apply(&self, config: &DispersionConfig) -> Result<DispersionConfig, ScoreError> {
        let mut merged = config.clone();
        if let Some(alpha) = self.alpha {
            merged.alpha = alpha;
        }
        if let Some(size_floor) = self.size_floor {
            merged.size_floor = size_floor;
        }
        if self.no_penalties {
            merged.penalties = PenaltyTable::empty();
        } else if !self.penalties.is_empty() {
            merged.penalties = PenaltyTable::new(self.penalties.clone())?;
        }
        merged.validate()?;
        Ok(merged)
    }
}
