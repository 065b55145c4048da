//! # Trade Math
//!
//! Mathematical calculations for dollar-cost-averaging strategies.
//! This crate provides the average acquisition price of a series of
//! fixed-amount purchases and the deviation measures used to rank them.

use thiserror::Error;

pub mod cost_averaging;

/// Errors that can occur in trading-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::InvalidInput("price must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: price must be positive");

        let err = MathError::InsufficientData("no purchases".to_string());
        assert!(err.to_string().starts_with("Insufficient data"));
    }
}
