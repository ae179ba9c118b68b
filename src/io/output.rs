use crate::scoring::{AgreementLevel, ComparableRow, ScoreReport};
use clap::ValueEnum;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

/// Renders a report. Implementations flush before returning so a failed
/// write surfaces as an error instead of being lost on drop.
pub trait OutputWriter {
    fn write_report(&mut self, title: &str, report: &ScoreReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, _title: &str, report: &ScoreReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, title: &str, report: &ScoreReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# {title}")?;
        writeln!(self.writer)?;
        self.write_summary(report)?;
        self.write_comparables(&report.comparables)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_summary(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        let result = &report.result;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_row("Status", &result.status.to_string())?;
        self.write_row(
            "Sample size",
            &format!("{} of {}", result.sample_size, report.total_records),
        )?;
        self.write_row("Weighted mean PPSQM", &format_mean(result.weighted_mean_price_per_unit))?;
        self.write_row("Dispersion CV", &result.coefficient_of_variation.to_string())?;
        self.write_row("Quality score", &result.quality_score.value().to_string())?;
        self.write_row("Penalty multiplier", &report.penalty_multiplier.to_string())?;
        self.write_row("Agreement", report.agreement.label())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_row(&mut self, metric: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "| {metric} | {value} |")?;
        Ok(())
    }

    fn write_comparables(&mut self, rows: &[ComparableRow]) -> anyhow::Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Comparables")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| # | Price | Size | Similarity | PPSQM | Weight | Included |"
        )?;
        writeln!(
            self.writer,
            "|---|-------|------|------------|-------|--------|----------|"
        )?;
        for row in rows {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} | {} |",
                row.index + 1,
                row.price,
                row.size,
                row.similarity,
                format_optional(row.price_per_unit, 2),
                format_optional(row.weight, 3),
                if row.included { "yes" } else { "no" }
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, title: &str, report: &ScoreReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.len()).blue())?;
        writeln!(self.writer)?;
        self.write_summary(report)?;
        if !report.comparables.is_empty() {
            writeln!(self.writer, "{}", comparables_table(&report.comparables))?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_summary(&mut self, report: &ScoreReport) -> anyhow::Result<()> {
        let result = &report.result;
        writeln!(
            self.writer,
            "  Sample size: {} of {} ({} excluded)",
            result.sample_size, report.total_records, report.excluded_records
        )?;
        if !result.is_ok() {
            writeln!(
                self.writer,
                "  {} no valid comparables, dispersion not assessed",
                "Insufficient data:".yellow()
            )?;
            writeln!(self.writer)?;
            return Ok(());
        }
        writeln!(
            self.writer,
            "  Weighted mean PPSQM: {}",
            format_mean(result.weighted_mean_price_per_unit)
        )?;
        writeln!(
            self.writer,
            "  Dispersion CV: {}",
            result.coefficient_of_variation
        )?;
        if report.penalty_multiplier < 1.0 {
            writeln!(
                self.writer,
                "  Penalty multiplier: {}",
                report.penalty_multiplier.to_string().red()
            )?;
        }
        writeln!(
            self.writer,
            "  Quality score: {} ({} agreement)",
            result.quality_score.value(),
            colored_agreement(report.agreement)
        )?;
        writeln!(self.writer)?;
        Ok(())
    }
}

fn comparables_table(rows: &[ComparableRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#", "Price", "Size", "Similarity", "PPSQM", "Weight", "Included",
        ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.index + 1),
            Cell::new(row.price),
            Cell::new(row.size),
            Cell::new(row.similarity),
            Cell::new(format_optional(row.price_per_unit, 2)),
            Cell::new(format_optional(row.weight, 3)),
            Cell::new(if row.included { "yes" } else { "no" }),
        ]);
    }
    table
}

fn colored_agreement(level: AgreementLevel) -> ColoredString {
    match level {
        AgreementLevel::High => level.label().green(),
        AgreementLevel::Moderate => level.label().yellow(),
        AgreementLevel::Low => level.label().red(),
        AgreementLevel::Insufficient => level.label().dimmed(),
    }
}

fn format_mean(mean: Option<f64>) -> String {
    format_optional(mean, 2)
}

fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

pub fn create_writer<'a>(format: OutputFormat, out: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(out)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(out)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(out)),
    }
}
