//! Mathematical utilities: descriptive statistics and simple least squares.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
