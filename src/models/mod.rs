//! Forecasting model implementations.
//!
//! Models are implemented as small, pure functions so that the engine can stay
//! generic over the strategy.

pub mod holt;
pub mod model;
pub mod seasonal;
pub mod trend;

pub use holt::*;
pub use model::*;
pub use seasonal::*;
pub use trend::*;
