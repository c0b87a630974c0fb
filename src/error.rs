//! Error types.
//!
//! Two layers:
//!
//! - [`ForecastError`]: the forecasting core's taxonomy. Every variant is local
//!   to a single forecast call; none is fatal to the process.
//! - [`AppError`]: what the binary reports. It carries the process exit code:
//!   `2` usage/config/input, `3` insufficient data, `4` external/data failure.

use thiserror::Error;

/// Result alias for the forecasting core.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors raised by the forecasting core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Not enough observations for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A cost is non-finite or negative.
    #[error("invalid observation at index {index}: cost {cost} must be finite and non-negative")]
    InvalidObservation { index: usize, cost: f64 },

    /// A computation hit a zero denominator.
    #[error("degenerate arithmetic: {0}")]
    ArithmeticDegenerate(&'static str),

    /// A model or engine parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        let code = match err {
            ForecastError::InsufficientData { .. } => 3,
            ForecastError::InvalidObservation { .. } | ForecastError::InvalidParameter(_) => 2,
            ForecastError::ArithmeticDegenerate(_) => 4,
        };
        AppError::new(code, err.to_string())
    }
}
