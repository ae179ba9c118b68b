use crate::cli::ScoringOverrides;
use crate::config::{self, CompdispConfig};
use crate::io::{self, OutputFormat};
use crate::scoring::ScoreReport;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

pub struct ScoreConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ScoringOverrides,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub raw: bool,
}

pub fn handle_score(config: ScoreConfig) -> Result<()> {
    let (file_config, source) = config::load_config(config.config.as_deref())?;
    debug!("Using configuration from {}", source);
    let settings = resolve_settings(&file_config, &config)?;

    let contents = io::read_input(&config.input)
        .with_context(|| format!("Reading comparables from {}", config.input.display()))?;
    let comparables = io::parse_comparables(&contents)
        .with_context(|| format!("Parsing comparables from {}", config.input.display()))?;
    debug!("Read {} comparable records", comparables.len());

    let report = build_report(&comparables, &settings, config.raw)?;
    debug!(
        "Scored {} comparables, {} excluded",
        report.result.sample_size, report.excluded_records
    );

    let format = config.format.unwrap_or(settings.output.default_format);
    let out = io::open_output(config.output.as_deref())?;
    crate::io::create_writer(format, out).write_report("Comparable dispersion", &report)
}

/// Config file values with CLI overrides layered on top.
pub fn resolve_settings(file_config: &CompdispConfig, config: &ScoreConfig) -> Result<CompdispConfig> {
    let mut settings = file_config.clone();
    settings.scoring = config
        .overrides
        .apply(&file_config.scoring)
        .context("Invalid scoring parameters")?;
    Ok(settings)
}

pub fn build_report(
    comparables: &[crate::scoring::ComparableRecord],
    settings: &CompdispConfig,
    raw: bool,
) -> Result<ScoreReport> {
    let report = ScoreReport::build(comparables, &settings.scoring, &settings.agreement)?;
    Ok(if settings.output.round && !raw {
        report.rounded()
    } else {
        report
    })
}
