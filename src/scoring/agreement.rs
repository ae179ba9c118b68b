//! Human-readable market agreement level derived from a dispersion score.
//!
//! Report narratives describe comparable evidence as showing a high,
//! moderate, or low level of agreement on the price-per-area basis. The
//! bands default to `score > 0.8` and `score > 0.5`.

use super::dispersion::DispersionResult;
use super::error::ScoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    High,
    Moderate,
    Low,
    /// No valid comparables to judge.
    Insufficient,
}

impl AgreementLevel {
    pub fn from_result(result: &DispersionResult, bands: &AgreementBands) -> Self {
        if !result.is_ok() {
            return AgreementLevel::Insufficient;
        }
        bands.classify(result.quality_score.value())
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgreementLevel::High => "high",
            AgreementLevel::Moderate => "moderate",
            AgreementLevel::Low => "low",
            AgreementLevel::Insufficient => "insufficient",
        }
    }
}

impl std::fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Score cut points, exclusive: a score must exceed `high` to be `High`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementBands {
    #[serde(default = "default_high_band")]
    pub high: f64,
    #[serde(default = "default_moderate_band")]
    pub moderate: f64,
}

pub fn default_high_band() -> f64 {
    0.8
}

pub fn default_moderate_band() -> f64 {
    0.5
}

impl Default for AgreementBands {
    fn default() -> Self {
        Self {
            high: default_high_band(),
            moderate: default_moderate_band(),
        }
    }
}

impl AgreementBands {
    pub fn new(high: f64, moderate: f64) -> Result<Self, ScoreError> {
        let bands = Self { high, moderate };
        bands.validate()?;
        Ok(bands)
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if in_unit(self.high) && in_unit(self.moderate) && self.moderate <= self.high {
            Ok(())
        } else {
            Err(ScoreError::InvalidAgreementBands {
                high: self.high,
                moderate: self.moderate,
            })
        }
    }

    pub fn classify(&self, score: f64) -> AgreementLevel {
        match score {
            s if s > self.high => AgreementLevel::High,
            s if s > self.moderate => AgreementLevel::Moderate,
            _ => AgreementLevel::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, ComparableRecord, DispersionConfig};

    #[test]
    fn classifies_on_exclusive_bands() {
        let bands = AgreementBands::default();
        assert_eq!(bands.classify(0.95), AgreementLevel::High);
        assert_eq!(bands.classify(0.8), AgreementLevel::Moderate);
        assert_eq!(bands.classify(0.51), AgreementLevel::Moderate);
        assert_eq!(bands.classify(0.5), AgreementLevel::Low);
        assert_eq!(bands.classify(0.0), AgreementLevel::Low);
    }

    #[test]
    fn insufficient_data_is_its_own_level() {
        let result = score(&[], &DispersionConfig::default()).unwrap();
        assert_eq!(
            AgreementLevel::from_result(&result, &AgreementBands::default()),
            AgreementLevel::Insufficient
        );
    }

    #[test]
    fn tight_sample_is_high_agreement() {
        let comps = vec![
            ComparableRecord::new(500_000.0, 50.0, 0.95),
            ComparableRecord::new(510_000.0, 52.0, 0.90),
            ComparableRecord::new(480_000.0, 48.0, 0.85),
        ];
        let result = score(&comps, &DispersionConfig::default()).unwrap();
        assert_eq!(
            AgreementLevel::from_result(&result, &AgreementBands::default()),
            AgreementLevel::High
        );
    }

    #[test]
    fn rejects_inverted_bands() {
        assert!(AgreementBands::new(0.4, 0.6).is_err());
        assert!(AgreementBands::new(1.2, 0.5).is_err());
        assert!(AgreementBands::new(0.9, 0.9).is_ok());
    }

    #[test]
    fn serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&AgreementLevel::Insufficient).unwrap(),
            "\"insufficient\""
        );
    }
}
