//! Comparable-sale dispersion scoring.
//!
//! The core entry point is [`score`]. Everything here is pure and
//! synchronous, so callers may score many properties in parallel.

pub mod agreement;
pub mod dispersion;
pub mod error;
pub mod penalty;
pub mod record;
pub mod report;
pub mod score_types;

pub use agreement::{AgreementBands, AgreementLevel};
pub use dispersion::{
    default_alpha, default_size_floor, score, DispersionConfig, DispersionResult,
    DispersionStatus,
};
pub use error::ScoreError;
pub use penalty::{PenaltyStep, PenaltyTable};
pub use record::ComparableRecord;
pub use report::{ComparableRow, ScoreReport};
pub use score_types::QualityScore;
