use serde::{Deserialize, Serialize};

use crate::io::output::OutputFormat;
use crate::scoring::{AgreementBands, DispersionConfig, ScoreError};

/// Root configuration structure for compdisp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompdispConfig {
    /// Scorer parameters: alpha, size floor, penalty table
    #[serde(default)]
    pub scoring: DispersionConfig,

    /// Score bands for the agreement classification
    #[serde(default)]
    pub agreement: AgreementBands,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl CompdispConfig {
    pub fn validate(&self) -> Result<(), ScoreError> {
        self.scoring.validate()?;
        self.agreement.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: OutputFormat,

    /// Round headline figures for display (CV/score 4 dp, mean 2 dp)
    #[serde(default = "default_round")]
    pub round: bool,
}

fn default_round() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::default(),
            round: default_round(),
        }
    }
}
