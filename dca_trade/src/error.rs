//! Error types for the dca_trade crate

use polars::prelude::PolarsError;
use thiserror::Error;
use trade_math::MathError;

/// Custom error types for the dca_trade crate
#[derive(Debug, Error)]
pub enum DcaError {
    /// Error related to loading or validating price data
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid strategy or run parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from an unusable date range
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Console input ended before a valid date range was entered
    #[error("Input closed before a valid date range was entered")]
    InputClosed,

    /// Error while rendering a chart
    #[error("Chart error: {0}")]
    ChartError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from cost-averaging arithmetic
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DcaError>;

impl From<PolarsError> for DcaError {
    fn from(err: PolarsError) -> Self {
        DcaError::PolarsError(err.to_string())
    }
}
