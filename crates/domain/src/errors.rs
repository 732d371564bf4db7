//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Location triple failed validation
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// A percentage value outside 0-100
    #[error("Invalid percentage: {0} is out of range (must be 0-100)")]
    InvalidPercentage(i64),

    /// Forecast snapshot violates an ordering or emptiness rule
    #[error("Invalid forecast: {0}")]
    InvalidForecast(String),
}

impl DomainError {
    /// Create an invalid location error
    pub fn invalid_location(reason: impl Into<String>) -> Self {
        Self::InvalidLocation(reason.into())
    }

    /// Create an invalid forecast error
    pub fn invalid_forecast(reason: impl Into<String>) -> Self {
        Self::InvalidForecast(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_location_error_message() {
        let err = DomainError::invalid_location("empty code");
        assert_eq!(err.to_string(), "Invalid location: empty code");
    }

    #[test]
    fn invalid_percentage_error_message() {
        let err = DomainError::InvalidPercentage(140);
        assert_eq!(
            err.to_string(),
            "Invalid percentage: 140 is out of range (must be 0-100)"
        );
    }

    #[test]
    fn invalid_forecast_error_message() {
        let err = DomainError::invalid_forecast("no records");
        assert_eq!(err.to_string(), "Invalid forecast: no records");
    }
}
