//! met.hu integration errors

use thiserror::Error;

/// Errors raised while resolving, fetching or parsing a forecast
#[derive(Debug, Error)]
pub enum MetHuError {
    /// The settlement name could not be mapped to a location
    #[error("Settlement resolution failed: {0}")]
    Resolution(String),

    /// Transport failure, including timeouts
    #[error("Forecast fetch failed: {0}")]
    Fetch(String),

    /// The provider answered with a non-success status
    #[error("Forecast fetch failed: HTTP {0}")]
    HttpStatus(u16),

    /// The forecast table could not be located in the document
    #[error("Forecast table not found: {0}")]
    ParseStructure(String),

    /// The table was found but yielded no forecast periods
    #[error("Forecast table contained no periods")]
    EmptyForecast,

    /// HTTP client or time zone setup failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

impl MetHuError {
    /// Whether the error came from the network leg of a cycle
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::HttpStatus(_))
    }

    /// Whether the document arrived but could not be used
    #[must_use]
    pub const fn is_parse_failure(&self) -> bool {
        matches!(self, Self::ParseStructure(_) | Self::EmptyForecast)
    }
}
