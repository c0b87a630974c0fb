//! `medcost` library crate.
//!
//! The binary (`medcost`) is a thin wrapper around this library so that:
//!
//! - the forecasting core is testable without spawning processes
//! - the engine is reusable from other services (it never touches storage)
//! - code stays easy to navigate as the project grows
//!
//! The usual entry point is [`ForecastEngine`]:
//!
//! ```
//! use chrono::NaiveDate;
//! use medcost::{ForecastEngine, ForecastOptions, Observation};
//!
//! let history: Vec<Observation> = [100.0, 110.0, 120.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &c)| Observation::new(NaiveDate::from_ymd_opt(2023, 1 + i as u32, 1).unwrap(), c))
//!     .collect();
//!
//! let engine = ForecastEngine::new(ForecastOptions::default()).unwrap();
//! let out = engine.forecast(&history, 2).unwrap();
//! assert_eq!(out.forecast.len(), 2);
//! assert!((out.forecast[0].point_estimate - 130.0).abs() < 1e-9);
//! ```

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod series;

pub use domain::{
    ConfidenceLevel, ForecastOptions, ForecastOutput, ForecastPoint, GapPolicy, HoltParams, IntervalPolicy,
    Observation, SeriesKey, StrategyKind, TrendAnalysis, TrendDirection,
};
pub use error::{AppError, ForecastError};
pub use forecast::{ForecastEngine, analyze_trend, forecast, forecast_batch};
