//! Write dashboard outputs as JSON.
//!
//! The JSON is the portable form of a chart: traces, axes and layout in a
//! plotly-like shape that can be fed to any web charting front-end.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{AppError, EXIT_INPUT};

/// Serialize `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), AppError> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create JSON '{}': {e}", path.display())))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write JSON: {e}")))?;
            writer
                .flush()
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write JSON: {e}")))?;
            tracing::info!(path = %path.display(), "wrote output JSON");
        }
        None => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}
