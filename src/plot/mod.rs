//! Terminal plots of cost history and forecasts.

pub mod ascii;

pub use ascii::*;
