//! Factory functions for scheduled tasks
//!
//! Provides the task closure that drives a forecast service's update cycle.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use application::{ApplicationError, ForecastService};
use tracing::debug;

/// Task name prefix for forecast refreshes
pub const FORECAST_REFRESH_TASK: &str = "forecast_refresh";

/// Boxed task future
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

/// Task name for a location's refresh job
#[must_use]
pub fn forecast_task_name(service: &ForecastService) -> String {
    format!("{FORECAST_REFRESH_TASK}:{}", service.location().code())
}

/// Create a forecast refresh task closure
///
/// An overlapping run counts as success: the cycle already in flight will
/// publish its own result.
pub fn create_forecast_refresh_task(
    service: Arc<ForecastService>,
) -> impl Fn() -> TaskFuture + Send + Sync + 'static {
    move || {
        let service = Arc::clone(&service);

        Box::pin(async move {
            match service.refresh().await {
                Ok(_) => Ok(()),
                Err(ApplicationError::RefreshInProgress) => {
                    debug!("Previous cycle still running, skipping");
                    Ok(())
                },
                Err(e) => Err(e.to_string()),
            }
        })
    }
}
