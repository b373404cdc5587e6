//! JSON ingest for the nested time-series document.
//!
//! The file is a pandas `to_json` export. Both the `records` orientation (an
//! array of `{name, data}` objects) and the default `columns` orientation
//! (`{"name": {"0": ..}, "data": {"0": ..}}`) are accepted. Unknown fields are
//! ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, EXIT_INPUT};

/// One series exactly as stored in the file, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSeriesRecord {
    pub name: String,
    pub data: Vec<RawObservation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObservation {
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    pub value: RawValue,
}

/// A numeric observation or the source's textual missing-data marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesFile {
    Records(Vec<RawSeriesRecord>),
    Columns {
        name: BTreeMap<String, String>,
        data: BTreeMap<String, Vec<RawObservation>>,
    },
}

/// Load every raw series record, in file order.
pub fn load_series(path: &Path) -> Result<Vec<RawSeriesRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let parsed: SeriesFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid series JSON '{}': {e}", path.display())))?;

    let records = match parsed {
        SeriesFile::Records(records) => records,
        SeriesFile::Columns { name, mut data } => columns_to_records(name, &mut data)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid series JSON '{}': {e}", path.display())))?,
    };

    tracing::info!(path = %path.display(), records = records.len(), "loaded series document");
    Ok(records)
}

fn columns_to_records(
    names: BTreeMap<String, String>,
    data: &mut BTreeMap<String, Vec<RawObservation>>,
) -> Result<Vec<RawSeriesRecord>, String> {
    let mut keyed = Vec::with_capacity(names.len());
    for (key, name) in names {
        let index = key
            .parse::<usize>()
            .map_err(|_| format!("non-numeric row key '{key}'"))?;
        let observations = data
            .remove(&key)
            .ok_or_else(|| format!("row '{key}' has a name but no data"))?;
        keyed.push((
            index,
            RawSeriesRecord {
                name,
                data: observations,
            },
        ));
    }
    if let Some(key) = data.keys().next() {
        return Err(format!("row '{key}' has data but no name"));
    }

    // BTreeMap orders "10" before "2"; restore the numeric row order.
    keyed.sort_by_key(|(index, _)| *index);
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_records_orientation_with_sentinel_values() {
        let file = write_json(
            r#"[{"name": "Total energy consumption, World, Annual", "units": "QBtu",
                 "data": [{"date": 1483228800000, "value": 570.1},
                          {"date": 1514764800000, "value": "--"}]}]"#,
        );
        let records = load_series(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data[0].value.as_number(), Some(570.1));
        assert_eq!(records[0].data[1].value, RawValue::Text("--".to_string()));
    }

    #[test]
    fn reads_columns_orientation_in_numeric_order() {
        let mut names = String::from("{");
        let mut data = String::from("{");
        for i in 0..12 {
            if i > 0 {
                names.push(',');
                data.push(',');
            }
            names.push_str(&format!(r#""{i}": "Total energy consumption, C{i}, Annual""#));
            data.push_str(&format!(r#""{i}": [{{"date": 0, "value": {i}}}]"#));
        }
        names.push('}');
        data.push('}');
        let file = write_json(&format!(r#"{{"name": {names}, "data": {data}}}"#));
        let records = load_series(file.path()).unwrap();
        assert_eq!(records.len(), 12);
        assert!(records[2].name.contains("C2,"));
        assert!(records[10].name.contains("C10,"));
    }

    #[test]
    fn rejects_malformed_json() {
        let file = write_json(r#"{"name": "#);
        let err = load_series(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn rejects_missing_file() {
        assert!(load_series(Path::new("nope.json")).is_err());
    }
}
