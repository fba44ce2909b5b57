use std::path::{Path, PathBuf};

use thiserror::Error;
use wagemap_core::SalaryRecord;

use crate::persist::{write_atomic, PersistError};

pub const CSV_HEADER: &str =
    "country_name,continent_name,wage_span,median_salary,average_salary,lowest_salary,highest_salary";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub row_count: usize,
    pub output_path: PathBuf,
}

/// Render the record set as CSV and write it atomically.
///
/// Absent continents and medians become empty cells; skipped countries are
/// simply not present.
pub fn write_csv(records: &[SalaryRecord], output_path: &Path) -> Result<ExportSummary, ExportError> {
    let mut buffer = String::with_capacity(64 * (records.len() + 1));
    buffer.push_str(CSV_HEADER);
    buffer.push('\n');
    for record in records {
        push_row(&mut buffer, record);
    }
    write_atomic(output_path, buffer.as_bytes())?;
    Ok(ExportSummary {
        row_count: records.len(),
        output_path: output_path.to_path_buf(),
    })
}

fn push_row(buffer: &mut String, record: &SalaryRecord) {
    let fields = [
        csv_field(&record.country),
        csv_field(record.continent.as_deref().unwrap_or("")),
        record.wage_span.to_string(),
        record.median.map(format_amount).unwrap_or_default(),
        format_amount(record.average),
        format_amount(record.lowest),
        format_amount(record.highest),
    ];
    buffer.push_str(&fields.join(","));
    buffer.push('\n');
}

/// Whole amounts print without a trailing ".0"; everything else keeps its
/// decimals as-is.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
