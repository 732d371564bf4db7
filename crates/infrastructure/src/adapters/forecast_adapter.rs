//! Forecast adapter - Implements ForecastPort using integration_methu

use std::sync::Arc;
use std::time::Instant;

use application::error::ApplicationError;
use application::ports::ForecastPort;
use async_trait::async_trait;
use domain::{ForecastSnapshot, LocationRef};
use integration_methu::{ForecastSource, MetHuClient, MetHuConfig, MetHuError};
use tracing::{debug, instrument};

/// Adapter for the met.hu settlement forecast
pub struct MetHuForecastAdapter {
    source: Arc<dyn ForecastSource>,
}

impl std::fmt::Debug for MetHuForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetHuForecastAdapter")
            .field("source", &"ForecastSource")
            .finish()
    }
}

impl MetHuForecastAdapter {
    /// Create a new adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        Self::with_config(MetHuConfig::default())
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize or the
    /// configured time zone is unknown.
    pub fn with_config(config: MetHuConfig) -> Result<Self, ApplicationError> {
        let client = MetHuClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_source(Arc::new(client)))
    }

    /// Wrap an existing forecast source
    #[must_use]
    pub fn with_source(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Map integration error to application error
    fn map_error(err: MetHuError) -> ApplicationError {
        match err {
            MetHuError::Resolution(e) => ApplicationError::Resolution(e),
            MetHuError::Fetch(e) => ApplicationError::Fetch(e),
            MetHuError::HttpStatus(status) => ApplicationError::Fetch(format!("HTTP {status}")),
            MetHuError::ParseStructure(e) => ApplicationError::ParseStructure(e),
            MetHuError::EmptyForecast => {
                ApplicationError::ParseStructure("forecast table contained no periods".into())
            },
            MetHuError::ClientInit(e) => ApplicationError::Configuration(e),
        }
    }
}

#[async_trait]
impl ForecastPort for MetHuForecastAdapter {
    #[instrument(skip(self))]
    async fn resolve(&self, settlement: &str) -> Result<LocationRef, ApplicationError> {
        let location = self
            .source
            .resolve(settlement)
            .await
            .map_err(Self::map_error)?;

        debug!(
            code = %location.code(),
            lat = location.latitude(),
            lon = location.longitude(),
            "Settlement resolved"
        );
        Ok(location)
    }

    #[instrument(skip(self), fields(settlement = %location.name(), kod = %location.code()))]
    async fn get_forecast(
        &self,
        location: &LocationRef,
    ) -> Result<ForecastSnapshot, ApplicationError> {
        let start = Instant::now();
        let result = self
            .source
            .get_forecast(location)
            .await
            .map_err(Self::map_error);

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(snapshot) => {
                debug!(
                    periods = snapshot.hourly().len(),
                    days = snapshot.daily().len(),
                    elapsed_ms,
                    "Retrieved forecast"
                );
            },
            Err(e) => {
                debug!(error = %e, elapsed_ms, "Failed to get forecast");
            },
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_adapter() {
        assert!(MetHuForecastAdapter::new().is_ok());
    }

    #[test]
    fn unknown_timezone_is_a_configuration_error() {
        let config = MetHuConfig {
            timezone: "Nowhere/Special".to_string(),
            ..MetHuConfig::default()
        };
        let err = MetHuForecastAdapter::with_config(config).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn debug_impl() {
        let adapter = MetHuForecastAdapter::new().unwrap();
        let debug_str = format!("{adapter:?}");
        assert!(debug_str.contains("MetHuForecastAdapter"));
    }

    #[test]
    fn map_error_http_status() {
        let err = MetHuForecastAdapter::map_error(MetHuError::HttpStatus(503));
        assert!(matches!(err, ApplicationError::Fetch(ref msg) if msg == "HTTP 503"));
        assert!(err.is_retryable());
    }

    #[test]
    fn map_error_fetch() {
        let err = MetHuForecastAdapter::map_error(MetHuError::Fetch("timed out".into()));
        assert!(matches!(err, ApplicationError::Fetch(_)));
    }

    #[test]
    fn map_error_empty_forecast_fails_the_cycle() {
        let err = MetHuForecastAdapter::map_error(MetHuError::EmptyForecast);
        assert!(matches!(err, ApplicationError::ParseStructure(_)));
        assert!(err.is_cycle_failure());
        assert!(!err.is_retryable());
    }

    #[test]
    fn map_error_resolution() {
        let err = MetHuForecastAdapter::map_error(MetHuError::Resolution("no candidates".into()));
        assert!(matches!(err, ApplicationError::Resolution(ref msg) if msg == "no candidates"));
    }
}
