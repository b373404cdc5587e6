//! CSV ingest for the two flat tables.
//!
//! This module is responsible for turning the consumption and intensity CSV
//! exports into typed rows.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Fail fast**: a malformed row aborts the load; there is no partial-data mode
//! - **Deterministic behavior**: rows keep file order
//! - **Separation of concerns**: no ranking or chart logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Category, ConsumptionRow, IntensityRow, MISSING_SENTINEL};
use crate::error::{AppError, EXIT_INPUT};

/// Load `master_cons.csv`: one row per (country, category).
pub fn load_consumption(path: &Path) -> Result<Vec<ConsumptionRow>, AppError> {
    let (mut reader, header_map) = open_csv(path)?;
    ensure_columns(path, &header_map, &["country", "label", "lastvalue"])?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record = result.map_err(|e| row_error(path, line, format!("CSV parse error: {e}")))?;
        let row = parse_consumption_row(&record, &header_map).map_err(|e| row_error(path, line, e))?;
        rows.push(row);
    }

    tracing::info!(path = %path.display(), rows = rows.len(), "loaded consumption table");
    Ok(rows)
}

/// Load `energy_int.csv`: per-capita and per-GDP intensity rows.
pub fn load_intensity(path: &Path) -> Result<Vec<IntensityRow>, AppError> {
    let (mut reader, header_map) = open_csv(path)?;
    ensure_columns(path, &header_map, &["country", "label", "lastvalue"])?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| row_error(path, line, format!("CSV parse error: {e}")))?;
        let row = parse_intensity_row(&record, &header_map).map_err(|e| row_error(path, line, e))?;
        rows.push(row);
    }

    tracing::info!(path = %path.display(), rows = rows.len(), "loaded intensity table");
    Ok(rows)
}

fn open_csv(path: &Path) -> Result<(csv::Reader<File>, HashMap<String, usize>), AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .clone();

    let header_map = build_header_map(&headers);
    Ok((reader, header_map))
}

fn ensure_columns(path: &Path, header_map: &HashMap<String, usize>, required: &[&str]) -> Result<(), AppError> {
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Missing required column `{name}` in '{}'", path.display()),
            ));
        }
    }
    Ok(())
}

fn row_error(path: &Path, line: usize, message: String) -> AppError {
    AppError::new(EXIT_INPUT, format!("{}:{line}: {message}", path.display()))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        // pandas writes its index as an unnamed leading column.
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_consumption_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<ConsumptionRow, String> {
    let country = get_required(record, header_map, "country")?.to_string();
    let label = get_required(record, header_map, "label")?;
    let label = Category::from_label(label).map_err(|e| e.to_string())?;

    Ok(ConsumptionRow {
        country,
        label,
        last_value: parse_opt_f64(record, header_map, "lastvalue")?,
        mbtu_pp: parse_opt_f64(record, header_map, "mbtupp")?,
        tbtu_usd: parse_opt_f64(record, header_map, "tbtuusd")?,
        dependence: parse_opt_f64(record, header_map, "dependence")?,
        ff_dependence: parse_opt_f64(record, header_map, "ff_dependence")?,
        lat: parse_opt_f64(record, header_map, "lat")?,
        long: parse_opt_f64(record, header_map, "long")?,
    })
}

fn parse_intensity_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<IntensityRow, String> {
    Ok(IntensityRow {
        country: get_required(record, header_map, "country")?.to_string(),
        label: get_required(record, header_map, "label")?.to_string(),
        last_value: parse_opt_f64(record, header_map, "lastvalue")?,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Empty cells, `NaN` and the `--` sentinel are missing; any other
/// non-numeric text is an error.
fn parse_opt_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<Option<f64>, String> {
    let Some(s) = get_optional(record, header_map, name) else {
        return Ok(None);
    };
    if s == MISSING_SENTINEL {
        return Ok(None);
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number in `{name}`: '{s}'"))?;
    Ok(if v.is_finite() { Some(v) } else { None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_consumption_rows_with_pandas_index_column() {
        let file = write_csv(
            ",country,label,lastValue,MBtuPP,TBtuUSD,dependence,lat,long\n\
             0,Norway,Total energy consumption,1.9,350.2,4.1,1.0,60.4,8.4\n\
             1,Norway,Coal,0.04,,,0.02,60.4,8.4\n",
        );
        let rows = load_consumption(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "Norway");
        assert_eq!(rows[0].label, Category::TotalEnergyConsumption);
        assert_eq!(rows[0].mbtu_pp, Some(350.2));
        assert_eq!(rows[1].label, Category::Coal);
        assert_eq!(rows[1].mbtu_pp, None);
        assert_eq!(rows[1].ff_dependence, None);
    }

    #[test]
    fn strips_bom_from_first_header() {
        let file = write_csv("\u{feff}country,label,lastValue\nWorld,Coal,160.0\n");
        let rows = load_consumption(file.path()).unwrap();
        assert_eq!(rows[0].last_value, Some(160.0));
    }

    #[test]
    fn rejects_missing_file() {
        let err = load_consumption(Path::new("does/not/exist.csv")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn rejects_missing_column() {
        let file = write_csv("country,lastValue\nWorld,1.0\n");
        let err = load_intensity(file.path()).unwrap_err();
        assert!(err.to_string().contains("`label`"));
    }

    #[test]
    fn rejects_unknown_label_with_line_number() {
        let file = write_csv("country,label,lastValue\nWorld,Coal,1\nWorld,Peat,2\n");
        let err = load_consumption(file.path()).unwrap_err();
        assert!(err.to_string().contains(":3:"), "{err}");
        assert!(err.to_string().contains("Peat"));
    }

    #[test]
    fn rejects_non_numeric_metric() {
        let file = write_csv("country,label,lastValue\nWorld,Coal,lots\n");
        assert!(load_consumption(file.path()).is_err());
    }

    #[test]
    fn sentinel_and_nan_load_as_missing() {
        let file = write_csv("country,label,lastValue\nA,Energy consumption per GDP,--\nB,Energy consumption per GDP,NaN\n");
        let rows = load_intensity(file.path()).unwrap();
        assert_eq!(rows[0].last_value, None);
        assert_eq!(rows[1].last_value, None);
    }
}
