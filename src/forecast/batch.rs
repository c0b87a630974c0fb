//! Forecast many independent series in parallel.
//!
//! Series share nothing, so each one runs on the rayon pool with the same
//! engine. A failing series is reported in its own slot and never aborts the
//! batch.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::{ForecastOutput, Observation, SeriesKey};
use crate::error::ForecastError;
use crate::forecast::engine::ForecastEngine;

/// Outcome for one series of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub key: SeriesKey,
    pub outcome: Result<ForecastOutput, ForecastError>,
}

/// Forecast every series in `series`; results come back in key order.
pub fn forecast_batch(
    engine: &ForecastEngine,
    series: &BTreeMap<SeriesKey, Vec<Observation>>,
    periods: usize,
) -> Vec<BatchItem> {
    let entries: Vec<(&SeriesKey, &Vec<Observation>)> = series.iter().collect();

    let items: Vec<BatchItem> = entries
        .par_iter()
        .map(|(key, observations)| BatchItem {
            key: (*key).clone(),
            outcome: engine.forecast(observations, periods),
        })
        .collect();

    let failed = items.iter().filter(|i| i.outcome.is_err()).count();
    tracing::info!(series = items.len(), failed, "batch forecast complete");

    items
}
