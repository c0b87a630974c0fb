//! Export forecasts to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per projected month, with the series key repeated on every row.
//! Fields are quoted only when needed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ForecastOutput, SeriesKey};
use crate::error::AppError;
use crate::forecast::BatchItem;

const HEADER: [&str; 8] = [
    "procedure",
    "region",
    "date",
    "point_estimate",
    "lower_bound",
    "upper_bound",
    "trend",
    "confidence",
];

/// Write one series' forecast to a CSV file.
pub fn write_forecast_csv(path: &Path, key: &SeriesKey, output: &ForecastOutput) -> Result<(), AppError> {
    let mut writer = create(path)?;
    write_header(&mut writer)?;
    write_rows(&mut writer, key, output)?;
    finish(writer)
}

/// Write every successful series of a batch to one CSV file.
///
/// Failed series are skipped; the caller reports them separately.
pub fn write_batch_csv(path: &Path, items: &[BatchItem]) -> Result<(), AppError> {
    let mut writer = create(path)?;
    write_header(&mut writer)?;
    for item in items {
        if let Ok(output) = &item.outcome {
            write_rows(&mut writer, &item.key, output)?;
        }
    }
    finish(writer)
}

fn create(path: &Path) -> Result<csv::Writer<File>, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    Ok(csv::Writer::from_writer(file))
}

fn write_header<W: Write>(writer: &mut csv::Writer<W>) -> Result<(), AppError> {
    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, key: &SeriesKey, output: &ForecastOutput) -> Result<(), AppError> {
    let trend = output.trend.to_string();
    let confidence = format!("{:.2}", output.confidence);
    for p in &output.forecast {
        writer
            .write_record([
                key.procedure.clone(),
                key.region.clone(),
                p.date.to_string(),
                format!("{:.2}", p.point_estimate),
                format!("{:.2}", p.lower_bound),
                format!("{:.2}", p.upper_bound),
                trend.clone(),
                confidence.clone(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

fn finish<W: Write>(mut writer: csv::Writer<W>) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}
