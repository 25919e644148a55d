//! Success-only report emission
//!
//! Maps a batch result to the external persisted shape: rows of
//! (URL, userName, pwd) for recovered credentials only. Failures stay
//! visible to the caller through the batch result itself.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::batch::{BatchResult, DecryptionOutcome};

/// Fixed CSV header row
pub const CSV_HEADER: &str = "URL,userName,pwd";

/// One recovered credential in export shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// Keep only `Success` outcomes, in batch (= input) order.
pub fn emit_rows(batch: &BatchResult<'_>) -> Vec<ReportRow> {
    batch
        .entries()
        .iter()
        .filter_map(|entry| match &entry.outcome {
            DecryptionOutcome::Success { plaintext } => Some(ReportRow {
                url: entry.record.url.clone(),
                username: entry.record.username.clone(),
                password: plaintext.clone(),
            }),
            DecryptionOutcome::Failure { .. } => None,
        })
        .collect()
}

/// Write rows to a CSV file with the fixed `URL,userName,pwd` header.
pub fn write_csv(rows: &[ReportRow], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report file {:?}", output_path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", CSV_HEADER)?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{}",
            csv_field(&row.url),
            csv_field(&row.username),
            csv_field(&row.password)
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the same rows as pretty JSON.
pub fn write_json(rows: &[ReportRow], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report {:?}", output_path))?;
    Ok(())
}

/// Quote a field only when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
