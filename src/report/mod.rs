//! Reporting utilities: formatted terminal output for forecasts, trends and batches.

pub mod format;

pub use format::*;
