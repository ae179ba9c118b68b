//! Built-in sample: three tight comparables, then the same three plus a
//! distant high-PPSQM outlier.

use crate::config::CompdispConfig;
use crate::io::{create_writer, OutputFormat};
use crate::scoring::{ComparableRecord, ScoreReport};
use anyhow::Result;

pub fn sample_comparables() -> Vec<ComparableRecord> {
    vec![
        ComparableRecord::new(500_000.0, 50.0, 0.95),
        ComparableRecord::new(510_000.0, 52.0, 0.90),
        ComparableRecord::new(480_000.0, 48.0, 0.85),
    ]
}

pub fn sample_with_outlier() -> Vec<ComparableRecord> {
    let mut comps = sample_comparables();
    comps.push(ComparableRecord::new(700_000.0, 50.0, 0.40));
    comps
}

pub fn run_demo(format: OutputFormat) -> Result<()> {
    let settings = CompdispConfig::default();
    let mut writer = create_writer(format, Box::new(std::io::stdout()));

    for (title, comps) in [
        ("Sample comparables", sample_comparables()),
        ("Sample comparables with outlier", sample_with_outlier()),
    ] {
        let report = ScoreReport::build(&comps, &settings.scoring, &settings.agreement)?.rounded();
        writer.write_report(title, &report)?;
    }
    Ok(())
}
