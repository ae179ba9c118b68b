//! Similarity-weighted price-per-area dispersion scorer.
//!
//! Given a set of comparable sales, the scorer:
//!
//! 1. Drops records that fail the validity filter (see [`ComparableRecord::is_valid`])
//! 2. Computes a similarity-weighted mean and standard deviation of price per unit area
//! 3. Converts the coefficient of variation into a score with `exp(-alpha * cv)`
//! 4. Applies the cumulative [`PenaltyTable`] and clamps to [0, 1]
//!
//! The computation is pure: no I/O, no logging, no shared state. Results
//! carry full precision; rounding belongs to the presentation layer
//! ([`DispersionResult::rounded`]).
//!
//! # Example
//!
//! ```rust
//! use comparable_dispersion::scoring::{score, ComparableRecord, DispersionConfig, DispersionStatus};
//!
//! let comps = vec![
//!     ComparableRecord::new(500_000.0, 50.0, 0.95),
//!     ComparableRecord::new(510_000.0, 52.0, 0.90),
//!     ComparableRecord::new(480_000.0, 48.0, 0.85),
//! ];
//! let result = score(&comps, &DispersionConfig::default()).unwrap();
//! assert_eq!(result.status, DispersionStatus::Ok);
//! assert_eq!(result.sample_size, 3);
//! assert!(result.quality_score.value() > 0.9);
//! ```

use super::error::ScoreError;
use super::penalty::PenaltyTable;
use super::record::ComparableRecord;
use super::score_types::QualityScore;
use serde::{Deserialize, Serialize};

/// Scorer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionConfig {
    /// Decay constant for the exponential score; must be > 0.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Records with `size <= size_floor` are excluded.
    #[serde(default = "default_size_floor")]
    pub size_floor: f64,

    #[serde(default)]
    pub penalties: PenaltyTable,
}

pub fn default_alpha() -> f64 {
    6.0
}

pub fn default_size_floor() -> f64 {
    10.0
}

impl Default for DispersionConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            size_floor: default_size_floor(),
            penalties: PenaltyTable::default(),
        }
    }
}

impl DispersionConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_size_floor(mut self, size_floor: f64) -> Self {
        self.size_floor = size_floor;
        self
    }

    pub fn with_penalties(mut self, penalties: PenaltyTable) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ScoreError::InvalidAlpha(self.alpha));
        }
        if !self.size_floor.is_finite() || self.size_floor < 0.0 {
            return Err(ScoreError::InvalidSizeFloor(self.size_floor));
        }
        self.penalties.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersionStatus {
    /// At least one valid comparable; statistics are defined.
    Ok,
    /// No valid comparables; CV and score are 0 and the mean is absent.
    InsufficientData,
}

impl std::fmt::Display for DispersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispersionStatus::Ok => write!(f, "ok"),
            DispersionStatus::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

/// Outcome of one scoring call.
///
/// Field names on the wire match the report pipeline
/// (`ppsqm_dispersion_cv`, `ppsqm_dispersion_score`, `weighted_mean_ppsqm`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispersionResult {
    #[serde(rename = "ppsqm_dispersion_cv")]
    pub coefficient_of_variation: f64,

    #[serde(rename = "ppsqm_dispersion_score")]
    pub quality_score: QualityScore,

    #[serde(
        rename = "weighted_mean_ppsqm",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weighted_mean_price_per_unit: Option<f64>,

    pub sample_size: usize,

    pub status: DispersionStatus,
}

impl DispersionResult {
    pub fn insufficient_data() -> Self {
        Self {
            coefficient_of_variation: 0.0,
            quality_score: QualityScore::ZERO,
            weighted_mean_price_per_unit: None,
            sample_size: 0,
            status: DispersionStatus::InsufficientData,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == DispersionStatus::Ok
    }

    /// Number of records the filter dropped out of `total` submitted.
    pub fn excluded(&self, total: usize) -> usize {
        total.saturating_sub(self.sample_size)
    }

    /// Copy rounded to display precision: CV and score to 4 decimals, mean to 2.
    pub fn rounded(&self) -> Self {
        Self {
            coefficient_of_variation: round_to(self.coefficient_of_variation, 4),
            quality_score: QualityScore::new(round_to(self.quality_score.value(), 4)),
            weighted_mean_price_per_unit: self.weighted_mean_price_per_unit.map(|m| round_to(m, 2)),
            ..*self
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeightedStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Normalises positive weights so they sum to one.
///
/// Weights are divided by the largest one before summing, so the total
/// stays finite even when individual similarities are near `f64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeightScale {
    max: f64,
    total: f64,
}

impl WeightScale {
    pub fn new<I>(weights: I) -> Self
    where
        I: Iterator<Item = f64> + Clone,
    {
        let max = weights.clone().fold(f64::MIN_POSITIVE, f64::max);
        let total = weights.map(|w| w / max).sum();
        Self { max, total }
    }

    pub fn normalise(&self, weight: f64) -> f64 {
        (weight / self.max) / self.total
    }
}

/// Similarity-weighted mean and standard deviation of `(value, weight)` pairs.
///
/// Weights must be positive and finite. An empty slice has no statistics.
pub(crate) fn weighted_stats(observations: &[(f64, f64)]) -> Option<WeightedStats> {
    let &(first, _) = observations.first()?;
    // Identical values: report exact zero spread instead of rounding residue.
    if observations.iter().all(|&(value, _)| value == first) {
        return Some(WeightedStats {
            mean: first,
            std_dev: 0.0,
        });
    }

    let scale = WeightScale::new(observations.iter().map(|&(_, w)| w));
    let mean: f64 = observations
        .iter()
        .map(|&(value, w)| scale.normalise(w) * value)
        .sum();
    let variance: f64 = observations
        .iter()
        .map(|&(value, w)| scale.normalise(w) * (value - mean).powi(2))
        .sum();

    Some(WeightedStats {
        mean,
        std_dev: variance.max(0.0).sqrt(),
    })
}

/// Score the dispersion of a comparable set.
///
/// Returns `Err` only for an invalid `config`; empty or entirely invalid
/// input yields an `insufficient_data` result.
pub fn score<'a, I>(comparables: I, config: &DispersionConfig) -> Result<DispersionResult, ScoreError>
where
    I: IntoIterator<Item = &'a ComparableRecord>,
{
    config.validate()?;

    let observations: Vec<(f64, f64)> = comparables
        .into_iter()
        .filter_map(|comp| {
            comp.price_per_unit(config.size_floor)
                .map(|ppu| (ppu, comp.similarity))
        })
        .collect();

    let Some(stats) = weighted_stats(&observations) else {
        return Ok(DispersionResult::insufficient_data());
    };
    let cv = if stats.mean > 0.0 {
        stats.std_dev / stats.mean
    } else {
        0.0
    };

    let decayed = (-config.alpha * cv).exp();
    let penalised = config.penalties.apply(cv, decayed);

    Ok(DispersionResult {
        coefficient_of_variation: cv,
        quality_score: QualityScore::new(penalised),
        weighted_mean_price_per_unit: Some(stats.mean),
        sample_size: observations.len(),
        status: DispersionStatus::Ok,
    })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn comparable() -> impl Strategy<Value = ComparableRecord> {
        (-1_000.0..5_000_000.0f64, -5.0..500.0f64, -0.2..1.2f64)
            .prop_map(|(price, size, similarity)| ComparableRecord::new(price, size, similarity))
    }

    proptest! {
        #[test]
        fn score_and_cv_are_bounded(comps in prop::collection::vec(comparable(), 0..40)) {
            let result = score(&comps, &DispersionConfig::default()).unwrap();
            prop_assert!(result.coefficient_of_variation >= 0.0);
            prop_assert!(result.quality_score.value() >= 0.0);
            prop_assert!(result.quality_score.value() <= 1.0);
            prop_assert!(result.sample_size <= comps.len());
        }

        #[test]
        fn identical_inputs_give_identical_results(comps in prop::collection::vec(comparable(), 0..20)) {
            let config = DispersionConfig::default();
            prop_assert_eq!(score(&comps, &config).unwrap(), score(&comps, &config).unwrap());
        }

        #[test]
        fn uniform_ppu_scores_one(
            ppu in 100.0..50_000.0f64,
            similarities in prop::collection::vec(0.01..1.0f64, 1..15),
        ) {
            let comps: Vec<ComparableRecord> = similarities
                .iter()
                .map(|&sim| ComparableRecord::new(ppu * 100.0, 100.0, sim))
                .collect();
            let result = score(&comps, &DispersionConfig::default()).unwrap();
            prop_assert_eq!(result.coefficient_of_variation, 0.0);
            prop_assert_eq!(result.quality_score.value(), 1.0);
        }

        #[test]
        fn widening_spread_around_fixed_mean_never_raises_score(
            mean in 1_000.0..20_000.0f64,
            spread in 0.01..0.45f64,
            extra in 0.01..0.45f64,
        ) {
            let narrow = symmetric_pair(mean, spread);
            let wide = symmetric_pair(mean, (spread + extra).min(0.95));
            let narrow_result = score(&narrow, &DispersionConfig::default()).unwrap();
            let wide_result = score(&wide, &DispersionConfig::default()).unwrap();

            prop_assert!(wide_result.coefficient_of_variation > narrow_result.coefficient_of_variation);
            prop_assert!(wide_result.quality_score <= narrow_result.quality_score);
        }
    }

    fn symmetric_pair(mean: f64, relative_spread: f64) -> Vec<ComparableRecord> {
        let size = 100.0;
        vec![
            ComparableRecord::new(mean * (1.0 - relative_spread) * size, size, 1.0),
            ComparableRecord::new(mean * (1.0 + relative_spread) * size, size, 1.0),
        ]
    }
}
