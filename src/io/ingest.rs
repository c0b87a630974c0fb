//! CSV ingest of historical costs.
//!
//! Turns a long-format CSV (one row per series and month) into per-series
//! observation lists.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip unparsable rows, but report what happened)
//! - **No cost policing**: negative or zero costs pass through unchanged; the
//!   engine rejects invalid values with the series context attached
//!
//! Accepted column names (case-insensitive):
//! `procedure`/`procedure_name`, `region`/`zip_code`, `date`,
//! `average_cost`/`cost`.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Observation, SeriesKey};
use crate::error::AppError;

const PROCEDURE_COLUMNS: [&str; 2] = ["procedure", "procedure_name"];
const REGION_COLUMNS: [&str; 2] = ["region", "zip_code"];
const DATE_COLUMNS: [&str; 1] = ["date"];
const COST_COLUMNS: [&str; 2] = ["average_cost", "cost"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Ingest output: observations per series + row errors.
#[derive(Debug, Clone, Default)]
pub struct IngestedSeries {
    pub series: BTreeMap<SeriesKey, Vec<Observation>>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a CSV file.
pub fn load_series_csv(path: &Path) -> Result<IngestedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_series_csv(file)?;
    tracing::info!(
        path = %path.display(),
        series = ingested.series.len(),
        rows_read = ingested.rows_read,
        rows_used = ingested.rows_used,
        "loaded historical costs"
    );
    Ok(ingested)
}

/// Parse CSV from any reader.
pub fn read_series_csv<R: Read>(reader: R) -> Result<IngestedSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let procedure_idx = require_column(&header_map, &PROCEDURE_COLUMNS)?;
    let region_idx = require_column(&header_map, &REGION_COLUMNS)?;
    let date_idx = require_column(&header_map, &DATE_COLUMNS)?;
    let cost_idx = require_column(&header_map, &COST_COLUMNS)?;

    let mut out = IngestedSeries::default();

    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        out.rows_read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, procedure_idx, region_idx, date_idx, cost_idx) {
            Ok((key, obs)) => {
                out.series.entry(key).or_default().push(obs);
                out.rows_used += 1;
            }
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }

    Ok(out)
}

fn parse_row(
    record: &StringRecord,
    procedure_idx: usize,
    region_idx: usize,
    date_idx: usize,
    cost_idx: usize,
) -> Result<(SeriesKey, Observation), String> {
    let procedure = required_field(record, procedure_idx, "procedure")?;
    let region = required_field(record, region_idx, "region")?;
    let raw_date = required_field(record, date_idx, "date")?;
    let raw_cost = required_field(record, cost_idx, "average_cost")?;

    let date = parse_date(raw_date).ok_or_else(|| format!("invalid date '{raw_date}'"))?;
    let cost: f64 = raw_cost
        .parse()
        .map_err(|_| format!("invalid average_cost '{raw_cost}'"))?;

    Ok((SeriesKey::new(procedure, region), Observation::new(date, cost)))
}

fn required_field<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    match record.get(idx) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing {name}")),
    }
}

/// Accepts `YYYY-MM-DD` or a bare `YYYY-MM` (first of the month).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn require_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("CSV is missing a required column (one of: {}).", names.join(", ")),
            )
        })
}
