//! CLI command implementations for compdisp operations.
//!
//! Available commands:
//! - **score**: Score the dispersion of one comparable set
//! - **section**: Build valuation-quality section envelopes for properties
//! - **demo**: Score the built-in sample comparables
//! - **init**: Initialize a new compdisp configuration file

pub mod demo;
pub mod init;
pub mod score;
pub mod section;

pub use demo::run_demo;
pub use init::init_config;
pub use score::{handle_score, ScoreConfig};
pub use section::{handle_section, SectionConfig};
