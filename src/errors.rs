//! Error types and validation functions for Granger causality testing.
//!
//! This module provides error handling for the whole causality pipeline:
//! configuration validation, per-pair data sufficiency checks, and numerical
//! failures in estimation and testing.

use thiserror::Error;

/// Error types for Granger causality operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CausalityError {
    /// Invalid configuration or dataset shape supplied by the caller.
    ///
    /// Raised eagerly, before any pair is processed; callers cannot recover
    /// per pair since the whole request is malformed.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Insufficient data for the requested lag order or estimation.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum required observations
        required: usize,
        /// Actual number of observations available
        actual: usize,
    },

    /// Numerical computation failed (singular matrix, degenerate covariance).
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for the numerical failure
        reason: String,
        /// Operation that failed, when known
        operation: Option<String>,
    },

    /// Result lookup for a dataset that was never added to the analyzer.
    #[error("Dataset not found: {name}")]
    DatasetNotFound {
        /// Name of the missing dataset
        name: String,
    },

    /// Analysis was cancelled by a caller-supplied cancellation flag.
    ///
    /// Outcomes completed before the flag was observed remain valid.
    #[error("Analysis cancelled before all pairs were processed")]
    Cancelled,
}

/// Result type for Granger causality operations.
///
/// Convenience alias for operations that may fail with [`CausalityError`].
pub type GrangerResult<T> = Result<T, CausalityError>;

/// Validates that a series has sufficient length for an operation.
///
/// # Arguments
/// * `data` - Input time series data
/// * `min_required` - Minimum number of observations required
///
/// # Returns
/// * `Ok(())` if the series is long enough
/// * `Err(CausalityError::InsufficientData)` otherwise
pub fn validate_data_length(data: &[f64], min_required: usize) -> GrangerResult<()> {
    if data.len() < min_required {
        Err(CausalityError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// NaN or infinite observations would propagate silently through the
/// least-squares machinery, so every column is checked on insertion.
///
/// # Arguments
/// * `data` - Array of values to validate
/// * `name` - Array name for error reporting
pub fn validate_all_finite(data: &[f64], name: &str) -> GrangerResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        return Err(CausalityError::NumericalError {
            reason: format!("{} contains non-finite value at index {}: {}", name, i, value),
            operation: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_data_length_sufficient() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(validate_data_length(&data, 3).is_ok());
        assert!(validate_data_length(&data, 5).is_ok());
    }

    #[test]
    fn test_validate_data_length_insufficient() {
        let data = vec![1.0, 2.0];
        match validate_data_length(&data, 5) {
            Err(CausalityError::InsufficientData { required, actual }) => {
                assert_eq!(required, 5);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected InsufficientData error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_all_finite_valid_array() {
        let data = vec![1.0, -2.0, 0.0, 1e-12, 1e12];
        assert!(validate_all_finite(&data, "series").is_ok());
    }

    #[test]
    fn test_validate_all_finite_reports_index() {
        let data = vec![1.0, 2.0, f64::NAN, 4.0];
        match validate_all_finite(&data, "series") {
            Err(CausalityError::NumericalError { reason, .. }) => {
                assert!(reason.contains("series"));
                assert!(reason.contains("index 2"));
            }
            other => panic!("Expected NumericalError, got {:?}", other),
        }

        let data = vec![f64::NEG_INFINITY, 2.0];
        assert!(validate_all_finite(&data, "series").is_err());
    }

    #[test]
    fn test_error_display_formatting() {
        let err = CausalityError::InvalidParameter {
            parameter: "max_lag".to_string(),
            value: 0.0,
            constraint: "must be >= 1".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("max_lag"));
        assert!(msg.contains("must be >= 1"));

        let err = CausalityError::InsufficientData {
            required: 16,
            actual: 10,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("16"));
        assert!(msg.contains("10"));

        let err = CausalityError::NumericalError {
            reason: "singular design matrix".to_string(),
            operation: Some("fit_bivariate_var".to_string()),
        };
        assert!(format!("{}", err).contains("singular design matrix"));
    }

    #[test]
    fn test_dataset_not_found_display() {
        let err = CausalityError::DatasetNotFound {
            name: "GDP".to_string(),
        };
        assert!(format!("{}", err).contains("GDP"));
    }
}
