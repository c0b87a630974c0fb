//! Read/write forecast report JSON files.
//!
//! A report is the portable record of one forecast run:
//! - the series key plus the region actually queried
//! - the engine options and horizon
//! - the history the forecast was built from
//! - the forecast itself (points, trend, confidence)
//!
//! The schema is defined by `domain::ForecastReport`. The `plot` command reads
//! these files back so a saved run can be re-rendered without refetching.

use std::fs::File;
use std::path::Path;

use crate::data::RegionResolution;
use crate::domain::{ForecastOptions, ForecastOutput, ForecastReport, Observation, SeriesKey};
use crate::error::AppError;

/// Assemble a report from a finished run.
pub fn build_report(
    key: &SeriesKey,
    region: &RegionResolution,
    periods: usize,
    options: ForecastOptions,
    historical: &[Observation],
    output: &ForecastOutput,
) -> ForecastReport {
    ForecastReport {
        tool: "medcost".to_string(),
        procedure: key.procedure.clone(),
        requested_region: region.requested.clone(),
        effective_region: region.effective.clone(),
        using_fallback_region: region.using_fallback,
        periods,
        options,
        historical: historical.to_vec(),
        result: output.clone(),
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &ForecastReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<ForecastReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: ForecastReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, StrategyKind, TrendDirection};
    use chrono::NaiveDate;

    #[test]
    fn report_json_has_flat_forecast_fields() {
        let key = SeriesKey::new("MRI", "99999");
        let region = RegionResolution {
            requested: "99999".to_string(),
            effective: "10001".to_string(),
            using_fallback: true,
        };
        let output = ForecastOutput {
            strategy: StrategyKind::HoltSmoothing,
            n_observations: 2,
            residual_std_dev: 1.5,
            forecast: vec![ForecastPoint {
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                point_estimate: 10.0,
                lower_bound: 8.0,
                upper_bound: 12.0,
            }],
            trend: TrendDirection::Stable,
            confidence: 0.7,
        };
        let report = build_report(&key, &region, 1, ForecastOptions::default(), &[], &output);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["trend"], "Stable");
        assert_eq!(value["forecast"][0]["date"], "2024-03-01");
        assert_eq!(value["effective_region"], "10001");
        assert_eq!(value["using_fallback_region"], true);

        let back: ForecastReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}
