//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Settlement could not be mapped to a provider location
    #[error("Settlement resolution failed: {0}")]
    Resolution(String),

    /// Network leg of an update cycle failed
    #[error("Forecast fetch failed: {0}")]
    Fetch(String),

    /// Forecast document was unusable
    #[error("Forecast structure not recognised: {0}")]
    ParseStructure(String),

    /// Another refresh is already running for this location
    #[error("A forecast refresh is already in progress")]
    RefreshInProgress,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// Only transport failures are worth retrying before the next
    /// scheduled cycle.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Whether the error ended an update cycle
    pub const fn is_cycle_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::ParseStructure(_))
    }
}
