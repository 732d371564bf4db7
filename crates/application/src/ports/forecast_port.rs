//! Forecast provider port
//!
//! Defines the interface for settlement resolution and forecast retrieval.

use async_trait::async_trait;
use domain::{ForecastSnapshot, LocationRef};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forecast provider operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Resolve a settlement name to a provider location
    ///
    /// Runs once per configured location, at setup time.
    async fn resolve(&self, settlement: &str) -> Result<LocationRef, ApplicationError>;

    /// Run one fetch, parse and aggregate cycle for a location
    ///
    /// A successful snapshot always holds at least one hourly record.
    async fn get_forecast(
        &self,
        location: &LocationRef,
    ) -> Result<ForecastSnapshot, ApplicationError>;
}
