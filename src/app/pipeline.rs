//! Shared "forecast pipeline" logic used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! source construction -> region resolution -> fetch -> forecast / trend / batch
//!
//! The command handlers can then focus on presentation (tables, JSON, plots).

use std::path::Path;

use crate::data::{
    CsvSource, HistoricalCostSource, RegionResolution, SampleSource, SupabaseSource, resolve_region,
};
use crate::domain::{
    ForecastConfig, ForecastOptions, ForecastOutput, Observation, SeriesKey, SourceKind, TrendAnalysis,
};
use crate::error::AppError;
use crate::forecast::{BatchItem, ForecastEngine, analyze_trend, forecast_batch};

/// All computed outputs of a single `medcost forecast` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The series actually fetched (effective region).
    pub key: SeriesKey,
    pub region: RegionResolution,
    /// History as returned by the source, ordered by date.
    pub historical: Vec<Observation>,
    pub output: ForecastOutput,
}

/// Outputs of a `medcost trend` run.
#[derive(Debug, Clone)]
pub struct TrendRun {
    pub key: SeriesKey,
    pub region: RegionResolution,
    pub analysis: TrendAnalysis,
}

/// Construct the configured data source.
pub fn build_source(config: &ForecastConfig) -> Result<Box<dyn HistoricalCostSource>, AppError> {
    match config.source {
        SourceKind::Supabase => Ok(Box::new(SupabaseSource::from_env()?)),
        SourceKind::Csv => {
            let path = config
                .input
                .as_deref()
                .ok_or_else(|| AppError::new(2, "--source csv requires --input <CSV>."))?;
            Ok(Box::new(CsvSource::open(path)?))
        }
        SourceKind::Sample => Ok(Box::new(SampleSource::new(config.sample.clone()))),
    }
}

/// Execute the full forecast pipeline and return the computed outputs.
pub fn run_forecast(config: &ForecastConfig) -> Result<RunOutput, AppError> {
    let source = build_source(config)?;
    run_forecast_with_source(config, source.as_ref())
}

/// Execute the forecast pipeline against an already constructed source.
pub fn run_forecast_with_source(
    config: &ForecastConfig,
    source: &dyn HistoricalCostSource,
) -> Result<RunOutput, AppError> {
    let (key, region, historical) = fetch(config, source)?;

    let engine = ForecastEngine::new(config.options)?;
    let output = engine.forecast(&historical, config.periods)?;

    if output.forecast.is_empty() && config.periods > 0 {
        tracing::warn!(series = %key, n = historical.len(), "not enough history for a forecast");
    }

    Ok(RunOutput {
        key,
        region,
        historical,
        output,
    })
}

/// Execute the trend-analysis pipeline.
pub fn run_trend(config: &ForecastConfig) -> Result<TrendRun, AppError> {
    let source = build_source(config)?;
    run_trend_with_source(config, source.as_ref())
}

/// Execute the trend-analysis pipeline against an already constructed source.
pub fn run_trend_with_source(
    config: &ForecastConfig,
    source: &dyn HistoricalCostSource,
) -> Result<TrendRun, AppError> {
    let (key, region, historical) = fetch(config, source)?;
    let analysis = analyze_trend(&historical, config.options)?;
    Ok(TrendRun { key, region, analysis })
}

/// Forecast every series found in a CSV file.
pub fn run_batch(input: &Path, options: ForecastOptions, periods: usize) -> Result<Vec<BatchItem>, AppError> {
    let source = CsvSource::open(input)?;
    if source.series().is_empty() {
        return Err(AppError::new(2, format!("No usable rows in '{}'.", input.display())));
    }
    let engine = ForecastEngine::new(options)?;
    Ok(forecast_batch(&engine, source.series(), periods))
}

fn fetch(
    config: &ForecastConfig,
    source: &dyn HistoricalCostSource,
) -> Result<(SeriesKey, RegionResolution, Vec<Observation>), AppError> {
    let region = resolve_region(&config.key.region, &config.available_regions);
    let key = SeriesKey::new(config.key.procedure.clone(), region.effective.clone());
    let mut historical = source.fetch_historical_costs(&key)?;
    historical.sort_by_key(|o| o.date);
    tracing::info!(series = %key, n = historical.len(), "history loaded");

    Ok((key, region, historical))
}
