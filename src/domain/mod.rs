//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - historical inputs (`Observation`, `SeriesKey`)
//! - engine configuration enums (`StrategyKind`, `IntervalPolicy`, `ConfidenceLevel`, `GapPolicy`)
//! - forecast outputs (`ForecastPoint`, `ForecastOutput`, `TrendAnalysis`)
//! - the run configuration derived from CLI flags (`ForecastConfig`)

pub mod types;

pub use types::*;
