//! Series-name parsing and normalization.
//!
//! Raw series names embed both the category and the country, e.g.
//! `"Total energy consumption from coal, Norway, Annual"`. The nuclear bucket's
//! own name contains commas, which pushes the country to a later token:
//! `"Total energy consumption from nuclear, renewables, and other, Norway, Annual"`.

use chrono::{DateTime, NaiveDate};

use crate::domain::{Category, NUCLEAR_PHRASE, Observation, SOURCE_PREFIX, SeriesDocument};
use crate::error::DataError;
use crate::io::series::RawSeriesRecord;

/// Classify a raw series name.
///
/// The nuclear/renewables/other phrase is checked first: its own commas mean it
/// never survives the split on `","` intact.
pub fn classify_category(name: &str) -> Result<Category, DataError> {
    if name.contains(NUCLEAR_PHRASE) {
        return Ok(Category::NuclearRenewablesAndOther);
    }
    let head = name.split(',').next().unwrap_or_default();
    Category::from_source_name(head).ok_or_else(|| DataError::UnknownCategory {
        name: name.to_string(),
    })
}

/// Display label derived from the category's full source name.
pub fn display_label(category: Category) -> String {
    if category == Category::TotalEnergyConsumption {
        return category.source_name().to_string();
    }
    let rest = category
        .source_name()
        .strip_prefix(SOURCE_PREFIX)
        .unwrap_or(category.source_name());
    capitalize(rest)
}

/// Country token of a raw series name.
pub fn parse_country(name: &str, category: Category) -> Result<String, DataError> {
    let token = category.country_token();
    name.split(", ")
        .nth(token)
        .map(str::to_string)
        .ok_or_else(|| DataError::MalformedName {
            name: name.to_string(),
            token,
        })
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn observation_date(millis: i64) -> NaiveDate {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .date_naive()
}

/// Normalize one record.
///
/// Returns `Ok(None)` when the final observation is missing: the record is
/// dropped rather than carried with a non-numeric last value.
pub fn normalize_record(record: &RawSeriesRecord) -> Result<Option<SeriesDocument>, DataError> {
    let category = classify_category(&record.name)?;
    let country = parse_country(&record.name, category)?;

    let Some(last_value) = record.data.last().and_then(|obs| obs.value.as_number()) else {
        return Ok(None);
    };

    let observations = record
        .data
        .iter()
        .map(|obs| Observation {
            date: observation_date(obs.date),
            value: obs.value.as_number(),
        })
        .collect();

    Ok(Some(SeriesDocument {
        raw_name: record.name.clone(),
        category,
        label: display_label(category),
        country,
        observations,
        last_value,
    }))
}

/// Normalize the whole collection, preserving input order.
///
/// Any unclassifiable or malformed name aborts the run; silently skipping it
/// would misalign labels and countries downstream.
pub fn normalize(records: &[RawSeriesRecord]) -> Result<Vec<SeriesDocument>, DataError> {
    let mut docs = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for record in records {
        match normalize_record(record)? {
            Some(doc) => docs.push(doc),
            None => {
                dropped += 1;
                tracing::debug!(name = %record.name, "dropping series with missing last value");
            }
        }
    }
    tracing::info!(kept = docs.len(), dropped, "normalized series");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::series::{RawObservation, RawValue};

    fn record(name: &str, values: &[Option<f64>]) -> RawSeriesRecord {
        RawSeriesRecord {
            name: name.to_string(),
            data: values
                .iter()
                .enumerate()
                .map(|(i, v)| RawObservation {
                    date: 1_483_228_800_000 + i as i64 * 31_536_000_000,
                    value: match v {
                        Some(v) => RawValue::Number(*v),
                        None => RawValue::Text("--".to_string()),
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn classifies_by_leading_segment() {
        assert_eq!(
            classify_category("Total energy consumption from coal, Chile, Annual").unwrap(),
            Category::Coal
        );
        assert_eq!(
            classify_category("Total energy consumption, Chile, Annual").unwrap(),
            Category::TotalEnergyConsumption
        );
        assert_eq!(
            classify_category("Total energy consumption from petroleum and other liquids, Chile, Annual").unwrap(),
            Category::PetroleumAndOtherLiquids
        );
    }

    #[test]
    fn nuclear_phrase_wins_over_prefix_matching() {
        let name = "Total energy consumption from nuclear, renewables, and other, Chile, Annual";
        assert_eq!(classify_category(name).unwrap(), Category::NuclearRenewablesAndOther);
        assert_eq!(parse_country(name, Category::NuclearRenewablesAndOther).unwrap(), "Chile");
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        let err = classify_category("Total energy consumption from peat, Chile, Annual").unwrap_err();
        assert!(matches!(err, DataError::UnknownCategory { .. }));
    }

    #[test]
    fn classification_is_idempotent() {
        let name = "Total energy consumption from natural gas, Chile, Annual";
        assert_eq!(classify_category(name), classify_category(name));
    }

    #[test]
    fn labels_strip_prefix_and_capitalize() {
        assert_eq!(display_label(Category::NaturalGas), "Natural gas");
        assert_eq!(display_label(Category::NuclearRenewablesAndOther), "Nuclear, renewables, and other");
        assert_eq!(display_label(Category::TotalEnergyConsumption), "Total energy consumption");
        for c in Category::ALL {
            assert_eq!(display_label(c), c.label());
        }
    }

    #[test]
    fn missing_country_token_is_an_error() {
        let err = parse_country("Total energy consumption from coal", Category::Coal).unwrap_err();
        assert_eq!(
            err,
            DataError::MalformedName {
                name: "Total energy consumption from coal".to_string(),
                token: 1
            }
        );
    }

    #[test]
    fn drops_records_whose_last_value_is_missing() {
        let records = vec![
            record("Total energy consumption, Chile, Annual", &[Some(1.0), Some(1.5)]),
            record("Total energy consumption from coal, Chile, Annual", &[Some(0.2), None]),
            record("Total energy consumption from coal, Peru, Annual", &[None, Some(0.1)]),
        ];
        let docs = normalize(&records).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.last_value.is_finite()));
        assert_eq!(docs[0].last_value, 1.5);
        assert_eq!(docs[1].country, "Peru");
        assert_eq!(docs[1].observations[0].value, None);
        assert_eq!(docs[1].observations[0].date, NaiveDate::from_ymd_opt(2017, 1, 1).unwrap());
    }

    #[test]
    fn empty_series_is_dropped() {
        let docs = normalize(&[record("Total energy consumption, Chile, Annual", &[])]).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn unknown_category_aborts_normalization() {
        let records = vec![
            record("Total energy consumption, Chile, Annual", &[Some(1.0)]),
            record("Primary energy production, Chile, Annual", &[Some(1.0)]),
        ];
        assert!(normalize(&records).is_err());
    }

    #[test]
    fn normalization_is_deterministic() {
        let records = vec![
            record("Total energy consumption from nuclear, renewables, and other, Chile, Annual", &[Some(0.3)]),
            record("Total energy consumption, Chile, Annual", &[Some(1.0), None, Some(2.0)]),
        ];
        assert_eq!(normalize(&records).unwrap(), normalize(&records).unwrap());
    }
}
