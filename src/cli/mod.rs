//! Command-line parsing for the procedure cost forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the forecasting code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{ConfidenceLevel, GapPolicy, IntervalPolicy, SourceKind, StrategyKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "medcost", version, about = "Procedure cost forecasting (trend + seasonality, Holt)")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast one procedure/region, print the table, and optionally plot/export.
    Forecast(ForecastArgs),
    /// Print the short-horizon trend summary for one procedure/region.
    Trend(ForecastArgs),
    /// Forecast every series in a CSV file in parallel.
    Batch(BatchArgs),
    /// Plot a previously exported forecast report JSON.
    Plot(PlotArgs),
}

/// Options for single-series commands.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Procedure name as stored in the cost table (e.g. "MRI").
    #[arg(short = 'p', long)]
    pub procedure: String,

    /// Region (ZIP code) to forecast.
    #[arg(short = 'r', long)]
    pub region: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print the forecast as JSON instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export forecast points to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full run (history + forecast) to JSON.
    #[arg(long = "export-report")]
    pub export_report: Option<PathBuf>,
}

/// Where the history comes from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Historical data source.
    #[arg(long, value_enum, default_value_t = SourceKind::Supabase)]
    pub source: SourceKind,

    /// CSV file for `--source csv` (procedure,region,date,average_cost).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// First month of synthetic history (`--source sample`).
    #[arg(long, default_value = "2021-01-01")]
    pub sample_start: NaiveDate,

    /// Months of synthetic history.
    #[arg(long, default_value_t = 36)]
    pub sample_months: usize,

    /// Starting average cost of synthetic history.
    #[arg(long, default_value_t = 1500.0)]
    pub sample_base_cost: f64,

    /// Relative monthly growth of synthetic history (0.005 = +0.5%/month).
    #[arg(long, default_value_t = 0.005)]
    pub sample_growth: f64,

    /// Relative amplitude of the yearly cycle.
    #[arg(long, default_value_t = 0.05)]
    pub sample_seasonality: f64,

    /// Relative noise level.
    #[arg(long, default_value_t = 0.02)]
    pub sample_noise: f64,

    /// Random seed for synthetic history (mixed with procedure/region).
    #[arg(long, default_value_t = 42)]
    pub sample_seed: u64,
}

/// Forecast engine settings shared by every forecasting command.
#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Months to forecast past the last observation.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub periods: usize,

    /// Forecasting strategy.
    #[arg(long, value_enum, default_value_t = StrategyKind::SeasonalTrend)]
    pub strategy: StrategyKind,

    /// How the forecast band is derived.
    #[arg(long, value_enum, default_value_t = IntervalPolicy::ResidualSigma)]
    pub interval: IntervalPolicy,

    /// Nominal band coverage in percent.
    #[arg(long, value_enum, default_value_t = ConfidenceLevel::P95)]
    pub level: ConfidenceLevel,

    /// Holt level smoothing constant, in (0, 1).
    #[arg(long, default_value_t = 0.3)]
    pub alpha: f64,

    /// Holt trend smoothing constant, in (0, 1).
    #[arg(long, default_value_t = 0.1)]
    pub beta: f64,

    /// Missing-month handling.
    #[arg(long, value_enum, default_value_t = GapPolicy::Keep)]
    pub gaps: GapPolicy,

    /// Add bounded, seeded noise to point estimates.
    #[arg(long)]
    pub perturb: bool,

    /// Seed for `--perturb`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Round estimates and bounds to whole currency units.
    #[arg(long)]
    pub round: bool,
}

/// Options for batch forecasting.
#[derive(Debug, Parser, Clone)]
pub struct BatchArgs {
    /// CSV file with one row per series and month.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print every result as JSON instead of the summary table.
    #[arg(long)]
    pub json: bool,

    /// Export all forecast points to one CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for plotting a saved report.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Report JSON file produced by `medcost forecast --export-report`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
