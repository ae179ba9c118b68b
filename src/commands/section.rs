use crate::cli::{setup, ScoringOverrides};
use crate::config;
use crate::io;
use crate::section::build_sections;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info_span};

pub struct SectionConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ScoringOverrides,
    pub output: Option<PathBuf>,
    pub jobs: usize,
}

pub fn handle_section(config: SectionConfig) -> Result<()> {
    let (mut settings, source) = config::load_config(config.config.as_deref())?;
    debug!("Using configuration from {}", source);
    settings.scoring = config
        .overrides
        .apply(&settings.scoring)
        .context("Invalid scoring parameters")?;

    let contents = io::read_input(&config.input)
        .with_context(|| format!("Reading properties from {}", config.input.display()))?;
    let properties = io::parse_properties(&contents)
        .with_context(|| format!("Parsing properties from {}", config.input.display()))?;

    setup::configure_thread_pool(config.jobs);
    debug!(
        "Building {} sections on {} workers",
        properties.len(),
        setup::get_worker_count(config.jobs)
    );
    let sections = {
        let _span = info_span!("build_sections", count = properties.len()).entered();
        build_sections(&properties, &settings)?
    };
    for section in &sections {
        debug!(
            "{}: {} with {} comparables",
            section.valuation_id, section.data.dispersion.status, section.data.dispersion.sample_size
        );
    }

    let mut out = io::open_output(config.output.as_deref())?;
    serde_json::to_writer_pretty(&mut out, &sections)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
