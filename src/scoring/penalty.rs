//! Step penalties applied on top of the exponential dispersion decay.
//!
//! The default table reproduces the pipeline's sanity overrides
//! (`cv > 0.35 → ×0.6`, `cv > 0.50 → ×0.4`). Steps are cumulative: a CV
//! above every threshold pays every multiplier. The defaults are heuristic
//! calibration, not a derived optimum.

use super::error::ScoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single `cv > threshold → score *= multiplier` rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyStep {
    pub threshold: f64,
    pub multiplier: f64,
}

impl PenaltyStep {
    pub const fn new(threshold: f64, multiplier: f64) -> Self {
        Self {
            threshold,
            multiplier,
        }
    }

    pub fn applies_to(&self, cv: f64) -> bool {
        cv > self.threshold
    }
}

impl fmt::Display for PenaltyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cv > {} → ×{}", self.threshold, self.multiplier)
    }
}

/// Parses the CLI form `THRESHOLD:MULTIPLIER`, e.g. `0.35:0.6`.
impl FromStr for PenaltyStep {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScoreError::InvalidPenaltyStep(s.to_string());
        let (threshold, multiplier) = s.split_once(':').ok_or_else(invalid)?;
        let threshold = threshold.trim().parse::<f64>().map_err(|_| invalid())?;
        let multiplier = multiplier.trim().parse::<f64>().map_err(|_| invalid())?;
        Ok(Self::new(threshold, multiplier))
    }
}

/// Ordered table of penalty steps, strictly ascending by threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PenaltyTable {
    steps: Vec<PenaltyStep>,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self {
            steps: vec![PenaltyStep::new(0.35, 0.6), PenaltyStep::new(0.50, 0.4)],
        }
    }
}

impl PenaltyTable {
    /// Build a validated table.
    pub fn new(steps: Vec<PenaltyStep>) -> Result<Self, ScoreError> {
        let table = Self { steps };
        table.validate()?;
        Ok(table)
    }

    /// A table with no steps: the score is the bare exponential decay.
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn steps(&self) -> &[PenaltyStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check every step and the ordering.
    ///
    /// Thresholds must be finite, non-negative and strictly ascending.
    /// Multipliers must lie in [0, 1] so a step can only lower the score.
    pub fn validate(&self) -> Result<(), ScoreError> {
        self.steps
            .iter()
            .enumerate()
            .try_for_each(|(index, step)| validate_step(index, step))?;

        match self
            .steps
            .windows(2)
            .position(|pair| pair[1].threshold <= pair[0].threshold)
        {
            Some(i) => Err(ScoreError::penalty(
                i + 1,
                format!(
                    "threshold {} is not greater than preceding threshold {}",
                    self.steps[i + 1].threshold,
                    self.steps[i].threshold
                ),
            )),
            None => Ok(()),
        }
    }

    /// Multiply `score` by every step whose threshold `cv` exceeds.
    pub fn apply(&self, cv: f64, score: f64) -> f64 {
        self.steps
            .iter()
            .filter(|step| step.applies_to(cv))
            .fold(score, |acc, step| acc * step.multiplier)
    }

    /// Net multiplier a given CV would pay.
    pub fn combined_multiplier(&self, cv: f64) -> f64 {
        self.apply(cv, 1.0)
    }
}

fn validate_step(index: usize, step: &PenaltyStep) -> Result<(), ScoreError> {
    if !step.threshold.is_finite() || step.threshold < 0.0 {
        return Err(ScoreError::penalty(
            index,
            format!("threshold must be finite and >= 0, got {}", step.threshold),
        ));
    }
    if !step.multiplier.is_finite() || !(0.0..=1.0).contains(&step.multiplier) {
        return Err(ScoreError::penalty(
            index,
            format!("multiplier must lie in [0, 1], got {}", step.multiplier),
        ));
    }
    Ok(())
}
