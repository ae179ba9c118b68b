//! Scoring result bundled with per-comparable detail for output writers.

use super::agreement::{AgreementBands, AgreementLevel};
use super::dispersion::{score, DispersionConfig, DispersionResult, WeightScale};
use super::error::ScoreError;
use super::record::ComparableRecord;
use serde::Serialize;

/// One input record as the writers display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparableRow {
    pub index: usize,
    pub price: f64,
    pub size: f64,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    /// Share of total similarity, only for included records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    #[serde(flatten)]
    pub result: DispersionResult,
    pub agreement: AgreementLevel,
    pub total_records: usize,
    pub excluded_records: usize,
    /// Net multiplier the penalty table applied.
    pub penalty_multiplier: f64,
    pub comparables: Vec<ComparableRow>,
}

impl ScoreReport {
    pub fn build(
        comparables: &[ComparableRecord],
        config: &DispersionConfig,
        bands: &AgreementBands,
    ) -> Result<Self, ScoreError> {
        let result = score(comparables, config)?;
        let agreement = AgreementLevel::from_result(&result, bands);

        let scale = WeightScale::new(
            comparables
                .iter()
                .filter(|c| c.price_per_unit(config.size_floor).is_some())
                .map(|c| c.similarity),
        );

        let rows = comparables
            .iter()
            .enumerate()
            .map(|(index, comp)| {
                let price_per_unit = comp.price_per_unit(config.size_floor);
                let included = price_per_unit.is_some();
                ComparableRow {
                    index,
                    price: comp.price,
                    size: comp.size,
                    similarity: comp.similarity,
                    price_per_unit,
                    weight: included.then(|| scale.normalise(comp.similarity)),
                    included,
                }
            })
            .collect();

        let penalty_multiplier = if result.is_ok() {
            config
                .penalties
                .combined_multiplier(result.coefficient_of_variation)
        } else {
            1.0
        };

        Ok(Self {
            result,
            agreement,
            total_records: comparables.len(),
            excluded_records: result.excluded(comparables.len()),
            penalty_multiplier,
            comparables: rows,
        })
    }

    /// Same report with the headline figures rounded for display.
    pub fn rounded(mut self) -> Self {
        self.result = self.result.rounded();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_mark_exclusions_and_weights() {
        let comps = vec![
            ComparableRecord::new(500_000.0, 50.0, 0.75),
            ComparableRecord::new(90_000.0, 6.0, 0.9),
            ComparableRecord::new(480_000.0, 48.0, 0.25),
        ];
        let report =
            ScoreReport::build(&comps, &DispersionConfig::default(), &AgreementBands::default())
                .unwrap();

        assert_eq!(report.total_records, 3);
        assert_eq!(report.excluded_records, 1);
        assert!(!report.comparables[1].included);
        assert_eq!(report.comparables[1].weight, None);
        assert_eq!(report.comparables[0].weight, Some(0.75));
        assert_eq!(report.comparables[2].weight, Some(0.25));
        assert_eq!(report.penalty_multiplier, 1.0);
    }

    #[test]
    fn huge_similarities_still_normalise() {
        let comps = vec![
            ComparableRecord::new(100_000.0, 50.0, 1e308),
            ComparableRecord::new(400_000.0, 50.0, 1e308),
        ];
        let report =
            ScoreReport::build(&comps, &DispersionConfig::default(), &AgreementBands::default())
                .unwrap();
        assert_eq!(report.comparables[0].weight, Some(0.5));
        assert_eq!(report.comparables[1].weight, Some(0.5));
    }

    #[test]
    fn flattened_json_keeps_pipeline_fields() {
        let comps = vec![ComparableRecord::new(500_000.0, 50.0, 1.0)];
        let report =
            ScoreReport::build(&comps, &DispersionConfig::default(), &AgreementBands::default())
                .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ppsqm_dispersion_score"], 1.0);
        assert_eq!(json["weighted_mean_ppsqm"], 10_000.0);
        assert_eq!(json["agreement"], "high");
    }

    #[test]
    fn penalty_multiplier_reflects_applied_steps() {
        let comps = vec![
            ComparableRecord::new(100_000.0, 100.0, 1.0),
            ComparableRecord::new(400_000.0, 100.0, 1.0),
        ];
        let report =
            ScoreReport::build(&comps, &DispersionConfig::default(), &AgreementBands::default())
                .unwrap();
        assert!((report.penalty_multiplier - 0.24).abs() < 1e-12);
        assert_eq!(report.agreement, AgreementLevel::Low);
    }
}
