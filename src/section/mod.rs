//! Valuation-quality report section.
//!
//! Report assembly consumes every section through the same envelope:
//! section name, version, the model that produced it, the data payload,
//! and free-text assumptions and limitations. This module produces that
//! envelope for the dispersion scorer.
//!
//! The subject property's own price per square meter is reported next to
//! the dispersion figures for context. It does not feed into the score.

use crate::config::CompdispConfig;
use crate::scoring::record::{lenient_comparables, lenient_opt_f64};
use crate::scoring::{score, AgreementLevel, ComparableRecord, DispersionResult, ScoreError};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

pub const SECTION_NAME: &str = "valuation_quality";
pub const SECTION_VERSION: &str = "v1";

/// The subset of a property document this section reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub valuation_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_comparables")]
    pub phase1_comparables: Option<Vec<ComparableRecord>>,

    #[serde(
        rename = "avm_price_april_2025",
        default,
        deserialize_with = "lenient_opt_f64"
    )]
    pub avm_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub total_size_sqm: Option<f64>,
}

impl PropertyRecord {
    pub fn valuation_id(&self) -> &str {
        self.valuation_id.as_deref().unwrap_or("unknown")
    }

    pub fn comparables(&self) -> &[ComparableRecord] {
        self.phase1_comparables.as_deref().unwrap_or(&[])
    }

    /// Subject price per square meter, when both figures are usable.
    pub fn subject_ppsqm(&self) -> Option<f64> {
        let price = self.avm_price.filter(|p| p.is_finite() && *p > 0.0)?;
        let size = self.total_size_sqm.filter(|s| s.is_finite() && *s > 0.0)?;
        Some(price / size)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientId {
    Text(String),
    Number(serde_json::Number),
    Other(serde::de::IgnoredAny),
}

/// Identifiers arrive as strings or bare numbers; anything else is absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientId::deserialize(deserializer)? {
        LenientId::Text(id) => Some(id),
        LenientId::Number(id) => Some(id.to_string()),
        LenientId::Other(_) => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
    pub temperature: f64,
}

impl ModelInfo {
    fn code() -> Self {
        Self {
            provider: "code".to_string(),
            model_name: "comparable_dispersion".to_string(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationQualityData {
    #[serde(flatten)]
    pub dispersion: DispersionResult,
    pub agreement: AgreementLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_ppsqm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOutput {
    pub valuation_id: String,
    pub section_name: String,
    pub version: String,
    pub model: ModelInfo,
    pub data: ValuationQualityData,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub limitations: Vec<String>,
}

pub fn build_valuation_quality_section(
    property: &PropertyRecord,
    config: &CompdispConfig,
) -> Result<SectionOutput, ScoreError> {
    let result = score(property.comparables(), &config.scoring)?;
    let agreement = AgreementLevel::from_result(&result, &config.agreement);
    let dispersion = if config.output.round {
        result.rounded()
    } else {
        result
    };

    Ok(SectionOutput {
        valuation_id: property.valuation_id().to_string(),
        section_name: SECTION_NAME.to_string(),
        version: SECTION_VERSION.to_string(),
        model: ModelInfo::code(),
        data: ValuationQualityData {
            dispersion,
            agreement,
            subject_ppsqm: property.subject_ppsqm(),
        },
        assumptions: vec!["Similarity-weighted statistics used".to_string()],
        limitations: vec!["Depends on availability and quality of phase 1 comparables".to_string()],
    })
}

/// Build sections for a batch in parallel; output order matches input order.
pub fn build_sections(
    properties: &[PropertyRecord],
    config: &CompdispConfig,
) -> Result<Vec<SectionOutput>, ScoreError> {
    // Fail fast on configuration before fanning out.
    config.validate()?;
    properties
        .par_iter()
        .map(|property| build_valuation_quality_section(property, config))
        .collect()
}
