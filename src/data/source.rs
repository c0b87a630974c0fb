//! The data-source seam and region resolution.
//!
//! The forecasting core never talks to storage. Callers fetch a series through
//! a [`HistoricalCostSource`] and hand the observations to the engine. Sources
//! are constructed explicitly and passed in; there is no process-wide client.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{Observation, SeriesKey};
use crate::error::AppError;
use crate::io::ingest::load_series_csv;

/// Anything that can return the historical costs of one series.
///
/// Results may be unsorted, empty, or contain a single observation.
pub trait HistoricalCostSource {
    fn fetch_historical_costs(&self, key: &SeriesKey) -> Result<Vec<Observation>, AppError>;
}

/// Series loaded from a `procedure,region,date,average_cost` CSV.
#[derive(Debug, Clone)]
pub struct CsvSource {
    series: BTreeMap<SeriesKey, Vec<Observation>>,
}

impl CsvSource {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let ingested = load_series_csv(path)?;
        for err in &ingested.row_errors {
            tracing::warn!(line = err.line, "skipped CSV row: {}", err.message);
        }
        Ok(Self {
            series: ingested.series,
        })
    }

    pub fn series(&self) -> &BTreeMap<SeriesKey, Vec<Observation>> {
        &self.series
    }
}

impl HistoricalCostSource for CsvSource {
    fn fetch_historical_costs(&self, key: &SeriesKey) -> Result<Vec<Observation>, AppError> {
        Ok(self.series.get(key).cloned().unwrap_or_default())
    }
}

/// Region actually queried for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionResolution {
    pub requested: String,
    pub effective: String,
    pub using_fallback: bool,
}

/// Map a requested region onto the regions the data source carries.
///
/// An unknown region falls back to the first available one. An empty list
/// means "no restriction".
pub fn resolve_region(requested: &str, available: &[String]) -> RegionResolution {
    let known = available.is_empty() || available.iter().any(|r| r == requested);
    let effective = match (known, available.first()) {
        (false, Some(first)) => first.clone(),
        _ => requested.to_string(),
    };
    let using_fallback = effective != requested;
    if using_fallback {
        tracing::info!(requested, effective = %effective, "region not available, using fallback");
    }
    RegionResolution {
        requested: requested.to_string(),
        effective,
        using_fallback,
    }
}

/// Parse a comma-separated region list, dropping blanks.
pub fn parse_region_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_region_falls_back_to_first_available() {
        let available = parse_region_list("10001, 10002,,10003");
        assert_eq!(available, vec!["10001", "10002", "10003"]);

        let r = resolve_region("10002", &available);
        assert_eq!(r.effective, "10002");
        assert!(!r.using_fallback);

        let r = resolve_region("94110", &available);
        assert_eq!(r.requested, "94110");
        assert_eq!(r.effective, "10001");
        assert!(r.using_fallback);
    }

    #[test]
    fn empty_region_list_disables_the_check() {
        let r = resolve_region("94110", &[]);
        assert_eq!(r.effective, "94110");
        assert!(!r.using_fallback);
    }
}
