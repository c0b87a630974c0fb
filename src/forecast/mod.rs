//! Forecast orchestration.
//!
//! Responsibilities:
//!
//! - derive the forecast band and confidence score (`interval`)
//! - project dated future points for one series (`engine`)
//! - short-horizon trend summaries (`analysis`)
//! - many independent series in parallel (`batch`)

pub mod analysis;
pub mod batch;
pub mod engine;
pub mod interval;

pub use analysis::*;
pub use batch::*;
pub use engine::*;
pub use interval::*;
