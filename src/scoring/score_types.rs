//! Bounded quality score.
//!
//! The dispersion score is always reported on a 0-1 scale. Encoding the
//! bound in a newtype keeps the clamp in one place instead of at every
//! construction site.
//!
//! # Examples
//!
//! ```rust
//! use comparable_dispersion::scoring::QualityScore;
//!
//! let score = QualityScore::new(0.85);
//! assert_eq!(score.value(), 0.85);
//!
//! // Out-of-bounds values are clamped
//! assert_eq!(QualityScore::new(1.7).value(), 1.0);
//! assert_eq!(QualityScore::new(-0.2).value(), 0.0);
//! ```

use serde::{Deserialize, Serialize};

/// Score on a 0-1 scale, clamped on construction.
///
/// Serialises as a bare number so JSON consumers see a plain float.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct QualityScore(f64);

impl QualityScore {
    pub const ZERO: QualityScore = QualityScore(0.0);
    pub const MAX: QualityScore = QualityScore(1.0);

    /// Create a new score, clamping to [0.0, 1.0]. NaN maps to 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw score value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for QualityScore {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<QualityScore> for f64 {
    fn from(score: QualityScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for QualityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_becomes_zero() {
        assert_eq!(QualityScore::new(f64::NAN), QualityScore::ZERO);
    }

    #[test]
    fn serialises_as_plain_number() {
        let json = serde_json::to_string(&QualityScore::new(0.5)).unwrap();
        assert_eq!(json, "0.5");
    }

    #[test]
    fn deserialising_clamps() {
        let score: QualityScore = serde_json::from_str("3.0").unwrap();
        assert_eq!(score, QualityScore::MAX);
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(QualityScore::new(0.98765).to_string(), "0.99");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn always_in_bounds(value in -10.0..10.0f64) {
            let score = QualityScore::new(value);
            prop_assert!(score.value() >= 0.0 && score.value() <= 1.0);
        }

        #[test]
        fn preserves_ordering_inside_range(a in 0.0..1.0f64, b in 0.0..1.0f64) {
            if a < b {
                prop_assert!(QualityScore::new(a) < QualityScore::new(b));
            }
        }
    }
}
