//! Reading comparable and property documents.
//!
//! Comparable documents come in three shapes: a bare JSON array, an object
//! with a `comparables` array, or an object with a `phase1_comparables`
//! array. Property documents are either one property object or a batch
//! wrapper with a `results` array.

use crate::core::errors::{Error, Result, ResultExt};
use crate::scoring::ComparableRecord;
use crate::section::PropertyRecord;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

const COMPARABLE_KEYS: [&str; 2] = ["comparables", "phase1_comparables"];

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin().read_to_string(&mut contents)?;
        return Ok(contents);
    }
    std::fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read input", path, e))
}

pub fn parse_comparables(contents: &str) -> Result<Vec<ComparableRecord>> {
    let document: Value = serde_json::from_str(contents)?;
    let list = match document {
        Value::Array(_) => document,
        Value::Object(mut map) => COMPARABLE_KEYS
            .iter()
            .find_map(|key| map.remove(*key))
            .ok_or_else(|| {
                Error::input(format!(
                    "expected a '{}' or '{}' array",
                    COMPARABLE_KEYS[0], COMPARABLE_KEYS[1]
                ))
            })?,
        other => {
            return Err(Error::input(format!(
                "expected an array or object of comparables, found {}",
                value_kind(&other)
            )))
        }
    };

    match list {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                ComparableRecord::from_value(item)
                    .map_err(Error::from)
                    .context(format!("comparable {index}"))
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::input(format!(
            "comparables must be an array, found {}",
            value_kind(&other)
        ))),
    }
}

pub fn parse_properties(contents: &str) -> Result<Vec<PropertyRecord>> {
    let mut document: Value = serde_json::from_str(contents)?;
    if !document.is_object() {
        return Err(Error::input(format!(
            "expected a property object, found {}",
            value_kind(&document)
        )));
    }

    match document.get_mut("results").map(Value::take) {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(Error::from)
                    .context(format!("property {index} in 'results'"))
            })
            .collect(),
        Some(_) => Err(Error::input("'results' must be an array of properties")),
        None => Ok(vec![serde_json::from_value(document)?]),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_array() {
        let comps = parse_comparables(
            r#"[{"price": 1, "total_size_sqm": 20, "similarity_score": 0.5}]"#,
        )
        .unwrap();
        assert_eq!(comps, vec![ComparableRecord::new(1.0, 20.0, 0.5)]);
    }

    #[test]
    fn wrapped_under_phase1_key() {
        let comps = parse_comparables(indoc! {r#"
            {
              "valuation_id": "V-1",
              "phase1_comparables": [
                {"price": 500000, "total_size_sqm": 50, "similarity_score": 0.95},
                {"price": 510000, "total_size_sqm": 52}
              ]
            }
        "#})
        .unwrap();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[1].similarity, 0.0);
    }

    #[test]
    fn non_object_entries_become_invalid_records() {
        let comps = parse_comparables("[42, null]").unwrap();
        assert_eq!(comps, vec![ComparableRecord::default(); 2]);
    }

    #[test]
    fn object_without_comparables_is_rejected() {
        let err = parse_comparables(r#"{"price": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(parse_comparables("3").is_err());
    }

    #[test]
    fn single_property() {
        let props = parse_properties(r#"{"valuation_id": "A", "phase1_comparables": []}"#).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].valuation_id(), "A");
    }

    #[test]
    fn batch_properties() {
        let props = parse_properties(indoc! {r#"
            {"results": [
                {"valuation_id": "A"},
                {"valuation_id": "B", "total_size_sqm": 80}
            ]}
        "#})
        .unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].valuation_id(), "B");
    }

    #[test]
    fn stray_comparable_entries_do_not_fail_the_batch() {
        let props = parse_properties(indoc! {r#"
            {"results": [
                {"valuation_id": "A", "phase1_comparables": [
                    null,
                    {"price": 500000, "total_size_sqm": 50, "similarity_score": 0.9}
                ]},
                {"valuation_id": "B"}
            ]}
        "#})
        .unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].comparables().len(), 2);
        assert_eq!(props[0].comparables()[0], ComparableRecord::default());
    }

    #[test]
    fn numeric_valuation_id_is_accepted() {
        let props = parse_properties(r#"{"valuation_id": 1234}"#).unwrap();
        assert_eq!(props[0].valuation_id(), "1234");
    }

    #[test]
    fn unusable_property_names_its_position() {
        let err = parse_properties(indoc! {r#"
            {"results": [
                {"valuation_id": "A"},
                {"valuation_id": "B", "phase1_comparables": "none"}
            ]}
        "#})
        .unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().starts_with("property 1 in 'results'"));
    }

    #[test]
    fn results_must_be_array() {
        assert!(parse_properties(r#"{"results": 5}"#).is_err());
    }
}
