//! Validation related error types

use thiserror::Error;

/// Configuration and range errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid widget or bar configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Bar constructed with a minimum above its maximum
    #[error("Invalid range: min_value {min} is greater than max_value {max}")]
    InvalidRange { min: f64, max: f64 },

    /// Value outside of the bar's declared bounds
    #[error("Value {value} is out of range (min {min}, max {})", format_bound(.max))]
    OutOfRange { value: f64, min: f64, max: Option<f64> },

    /// Update attempted after the bar finished
    #[error("Progress bar has already finished")]
    AlreadyFinished,
}

fn format_bound(bound: &Option<f64>) -> String {
    bound.map_or_else(|| "unknown".to_string(), |max| max.to_string())
}

impl ValidationError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }

    /// Create an invalid range error
    pub fn invalid_range(min: f64, max: f64) -> Self {
        Self::InvalidRange { min, max }
    }

    /// Create an out of range error
    pub fn out_of_range(value: f64, min: f64, max: Option<f64>) -> Self {
        Self::OutOfRange { value, min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_error() {
        let error = ValidationError::invalid_configuration("Bad marker");
        assert!(error.to_string().contains("Invalid configuration"));
        assert!(error.to_string().contains("Bad marker"));
    }

    #[test]
    fn test_invalid_range_error() {
        let error = ValidationError::invalid_range(10.0, 5.0);
        assert!(error.to_string().contains("min_value 10"));
        assert!(error.to_string().contains("max_value 5"));
    }

    #[test]
    fn test_out_of_range_without_max() {
        let error = ValidationError::out_of_range(-1.0, 0.0, None);
        assert!(error.to_string().contains("-1"));
        assert!(error.to_string().contains("unknown"));
    }
}
