//! Similarity-weighted comparable-sale dispersion scoring.
//!
//! The library core is [`scoring::score`], a pure function from a set of
//! comparable sales to a bounded quality score. The remaining modules are
//! the harness around it: configuration, document parsing, output writers,
//! and the valuation-quality section envelope.

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod scoring;
pub mod section;

// Re-export commonly used types
pub use crate::scoring::{
    score, AgreementBands, AgreementLevel, ComparableRecord, DispersionConfig, DispersionResult,
    DispersionStatus, PenaltyStep, PenaltyTable, QualityScore, ScoreError, ScoreReport,
};

pub use crate::config::{load_config, CompdispConfig};

pub use crate::section::{build_sections, build_valuation_quality_section, SectionOutput};
