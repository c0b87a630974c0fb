//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during forecasting
//! - exported to JSON/CSV
//! - deserialized straight from the hosted cost database responses

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One historical average-cost sample for a procedure in a region/month.
///
/// `average_cost` is accepted as an alias for `cost` because that is the column
/// name used by the historical cost table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    #[serde(alias = "average_cost")]
    pub cost: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, cost: f64) -> Self {
        Self { date, cost }
    }
}

/// Identifies one historical series: a procedure priced in a region.
///
/// The region is the ZIP code in the hosted data, kept as a string so leading
/// zeros survive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub procedure: String,
    pub region: String,
}

impl SeriesKey {
    pub fn new(procedure: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.procedure, self.region)
    }
}

/// Which forecasting strategy the engine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// OLS linear trend plus an additive monthly seasonal profile.
    #[default]
    SeasonalTrend,
    /// Holt's double exponential smoothing (level + trend, no seasonality).
    HoltSmoothing,
}

impl StrategyKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            StrategyKind::SeasonalTrend => "Linear trend + monthly seasonal",
            StrategyKind::HoltSmoothing => "Holt smoothing",
        }
    }
}

/// How the forecast band is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalPolicy {
    /// `estimate ± z·σ` where σ is the standard deviation of in-sample residuals.
    #[default]
    ResidualSigma,
    /// `estimate ± z·σ` where σ is the standard deviation of the historical costs.
    #[serde(rename = "cv")]
    #[value(name = "cv")]
    CoefficientOfVariation,
}

/// Nominal coverage of the forecast band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ConfidenceLevel {
    #[default]
    #[serde(rename = "95")]
    #[value(name = "95")]
    P95,
    #[serde(rename = "99")]
    #[value(name = "99")]
    P99,
}

impl ConfidenceLevel {
    /// Two-sided normal quantile used for the band half-width.
    pub fn z_score(self) -> f64 {
        match self {
            ConfidenceLevel::P95 => 1.96,
            ConfidenceLevel::P99 => 2.58,
        }
    }
}

/// What to do with calendar months missing from the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Treat consecutive observations as equally spaced, whatever their dates.
    #[default]
    Keep,
    /// Insert linearly interpolated observations for every missing month.
    Interpolate,
}

/// Holt smoothing constants, both strictly inside `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoltParams {
    /// Level smoothing constant.
    pub alpha: f64,
    /// Trend smoothing constant.
    pub beta: f64,
}

impl Default for HoltParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
        }
    }
}

/// Engine options. `Default` gives a deterministic seasonal-trend forecast with
/// a 95% residual-σ band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub strategy: StrategyKind,
    pub interval: IntervalPolicy,
    pub level: ConfidenceLevel,
    pub holt: HoltParams,
    pub gaps: GapPolicy,
    /// Add bounded uniform noise `(u - 0.5)·σ` to each point estimate.
    pub perturb: bool,
    /// Seed for the perturbation RNG (ignored unless `perturb` is set).
    pub seed: u64,
    /// Round estimate and bounds to whole currency units.
    pub round: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            interval: IntervalPolicy::default(),
            level: ConfidenceLevel::default(),
            holt: HoltParams::default(),
            gaps: GapPolicy::default(),
            perturb: false,
            seed: 42,
            round: false,
        }
    }
}

/// Direction of the projected cost relative to the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Stable,
    Decreasing,
}

impl TrendDirection {
    /// Classify a percent change (`+5%` / `-5%` thresholds, exclusive).
    pub fn from_percent_change(pct: f64) -> Self {
        if pct > 5.0 {
            TrendDirection::Rising
        } else if pct < -5.0 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Rising => "Rising",
            TrendDirection::Stable => "Stable",
            TrendDirection::Decreasing => "Decreasing",
        };
        f.write_str(s)
    }
}

/// One projected month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Result of a single forecast call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub strategy: StrategyKind,
    /// Observations used after normalization (including interpolated months).
    pub n_observations: usize,
    /// Standard deviation of the in-sample residuals (0 for an empty forecast).
    pub residual_std_dev: f64,
    pub forecast: Vec<ForecastPoint>,
    pub trend: TrendDirection,
    /// Reliability score in `[0, 1]`.
    pub confidence: f64,
}

/// Short-horizon summary of a series (latest cost, last move, next month).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub current_cost: f64,
    /// Percent change between the last two observations.
    pub percent_change: f64,
    pub forecast_next_month: f64,
    pub trend: TrendDirection,
}

/// A saved forecast report (JSON).
///
/// The forecast fields are flattened so the file reads as
/// `{ ..., "forecast": [...], "trend": "Rising", "confidence": 0.9 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub tool: String,
    pub procedure: String,
    pub requested_region: String,
    pub effective_region: String,
    pub using_fallback_region: bool,
    pub periods: usize,
    pub options: ForecastOptions,
    pub historical: Vec<Observation>,
    #[serde(flatten)]
    pub result: ForecastOutput,
}

/// Where historical observations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Hosted Postgres via its REST endpoint.
    Supabase,
    /// Local CSV (`procedure,region,date,average_cost`).
    Csv,
    /// Seeded synthetic history.
    Sample,
}

/// Settings for the synthetic history generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub months: usize,
    pub base_cost: f64,
    /// Relative trend per month (`0.005` = +0.5%/month).
    pub monthly_growth: f64,
    /// Relative amplitude of the yearly cycle.
    pub seasonal_amplitude: f64,
    /// Relative noise standard deviation.
    pub noise: f64,
    pub seed: u64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub key: SeriesKey,
    pub source: SourceKind,
    pub input: Option<PathBuf>,
    pub sample: SampleConfig,

    pub periods: usize,
    pub options: ForecastOptions,

    /// Regions the data source is known to carry; empty disables the check.
    pub available_regions: Vec<String>,

    pub json: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
}
