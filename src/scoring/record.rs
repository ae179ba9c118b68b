//! Comparable sale records as they arrive from the report pipeline.
//!
//! Records are deliberately lenient on the way in: a missing, `null`, or
//! non-numeric field becomes `0.0` and the record is then excluded by the
//! validity filter instead of failing the whole document. Bad data is a
//! data-quality problem, not a programmer error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One comparable sale, measured against a subject property.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparableRecord {
    /// Sale price in any currency unit, consistent within one call.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,

    /// Floor area, consistent unit within one call (square meters in the pipeline).
    #[serde(rename = "total_size_sqm", default, deserialize_with = "lenient_f64")]
    pub size: f64,

    /// Similarity weight relative to the subject, conventionally in [0, 1].
    #[serde(rename = "similarity_score", default, deserialize_with = "lenient_f64")]
    pub similarity: f64,
}

impl ComparableRecord {
    pub fn new(price: f64, size: f64, similarity: f64) -> Self {
        Self {
            price,
            size,
            similarity,
        }
    }

    /// Whether this record takes part in the dispersion statistics.
    ///
    /// A record is valid when every field is finite, `size > size_floor`,
    /// `price > 0` and `similarity > 0`.
    pub fn is_valid(&self, size_floor: f64) -> bool {
        self.price.is_finite()
            && self.size.is_finite()
            && self.similarity.is_finite()
            && self.size > size_floor
            && self.price > 0.0
            && self.similarity > 0.0
    }

    /// Price per unit area, or `None` when the record is filtered out.
    pub fn price_per_unit(&self, size_floor: f64) -> Option<f64> {
        if !self.is_valid(size_floor) {
            return None;
        }
        let ppu = self.price / self.size;
        ppu.is_finite().then_some(ppu)
    }

    /// Decode one entry of a comparable list.
    ///
    /// A non-object entry carries no usable fields and becomes a default
    /// record, which the validity filter then excludes.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }
}

/// A comparable list where stray entries are kept as invalid records
/// instead of failing the enclosing document.
pub(crate) fn lenient_comparables<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<ComparableRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(items) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .map(|item| ComparableRecord::from_value(item).map_err(<D::Error as serde::de::Error>::custom))
        .collect::<Result<Vec<_>, D::Error>>()
        .map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

/// Numbers and numeric strings; anything else is `None`.
pub(crate) fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match LenientNumber::deserialize(deserializer)? {
        LenientNumber::Number(n) => Some(n),
        LenientNumber::Text(s) => s.trim().parse::<f64>().ok(),
        LenientNumber::Other(_) => None,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_pipeline_field_names() {
        let record: ComparableRecord = serde_json::from_str(
            r#"{"price": 500000, "total_size_sqm": 50, "similarity_score": 0.95}"#,
        )
        .unwrap();
        assert_eq!(record, ComparableRecord::new(500000.0, 50.0, 0.95));
    }

    #[test]
    fn missing_and_null_fields_become_zero() {
        let record: ComparableRecord =
            serde_json::from_str(r#"{"price": null, "total_size_sqm": 40}"#).unwrap();
        assert_eq!(record, ComparableRecord::new(0.0, 40.0, 0.0));
        assert!(!record.is_valid(10.0));
    }

    #[test]
    fn numeric_strings_are_parsed_and_garbage_is_zero() {
        let record: ComparableRecord = serde_json::from_str(
            r#"{"price": "425000", "total_size_sqm": "n/a", "similarity_score": [1]}"#,
        )
        .unwrap();
        assert_eq!(record.price, 425000.0);
        assert_eq!(record.size, 0.0);
        assert_eq!(record.similarity, 0.0);
    }

    #[test]
    fn size_must_exceed_floor_strictly() {
        assert!(!ComparableRecord::new(100_000.0, 10.0, 0.5).is_valid(10.0));
        assert!(ComparableRecord::new(100_000.0, 10.5, 0.5).is_valid(10.0));
    }

    #[test]
    fn non_finite_values_are_invalid() {
        assert!(!ComparableRecord::new(f64::NAN, 50.0, 0.5).is_valid(10.0));
        assert!(!ComparableRecord::new(1.0, f64::INFINITY, 0.5).is_valid(10.0));
        assert!(!ComparableRecord::new(1.0, 50.0, f64::INFINITY).is_valid(10.0));
    }

    #[test]
    fn non_object_values_decode_to_invalid_records() {
        for value in [Value::Null, serde_json::json!(42), serde_json::json!("x")] {
            let record = ComparableRecord::from_value(value).unwrap();
            assert_eq!(record, ComparableRecord::default());
            assert!(!record.is_valid(0.0));
        }
    }

    #[test]
    fn price_per_unit_only_for_valid_records() {
        let record = ComparableRecord::new(500_000.0, 50.0, 0.9);
        assert_eq!(record.price_per_unit(10.0), Some(10_000.0));
        assert_eq!(record.price_per_unit(60.0), None);
    }
}
