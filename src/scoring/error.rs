use thiserror::Error;

/// Caller misuse of the scorer.
///
/// Bad comparable data never produces one of these; it is filtered out or
/// reported as `insufficient_data`. These variants mean the configuration
/// handed to the scorer is wrong and must not be absorbed into a zero score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("alpha must be a finite value greater than 0, got {0}")]
    InvalidAlpha(f64),

    #[error("size floor must be a finite value of at least 0, got {0}")]
    InvalidSizeFloor(f64),

    #[error("penalty table entry {index} is malformed: {reason}")]
    MalformedPenaltyTable { index: usize, reason: String },

    #[error("invalid penalty step '{0}', expected THRESHOLD:MULTIPLIER")]
    InvalidPenaltyStep(String),

    #[error("agreement bands must satisfy 0 <= moderate <= high <= 1, got moderate={moderate}, high={high}")]
    InvalidAgreementBands { high: f64, moderate: f64 },
}

impl ScoreError {
    pub(crate) fn penalty(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPenaltyTable {
            index,
            reason: reason.into(),
        }
    }
}
