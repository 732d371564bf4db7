//! Forecast service
//!
//! Owns one configured location: resolves it at setup, runs update cycles
//! through the forecast port and publishes the latest good snapshot.
//! A failed cycle never replaces the published snapshot.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use domain::{ForecastSnapshot, LocationRef};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::ForecastPort;
use crate::sensors::{self, CurrentConditions, SensorState, WeatherEntityState};

/// Hint appended to resolution failures
pub const MANUAL_ENTRY_HINT: &str =
    "enter the settlement code, latitude and longitude manually";

/// Provider location entered by hand when resolution fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualLocation {
    /// Provider settlement code
    pub code: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Outcome bookkeeping of the update cycles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatus {
    /// Last successful cycle
    pub last_success_at: Option<DateTime<Utc>>,
    /// Last failed cycle
    pub last_failure_at: Option<DateTime<Utc>>,
    /// Message of the last failure
    pub last_error: Option<String>,
    /// Failures since the last success
    pub consecutive_failures: u32,
}

impl UpdateStatus {
    /// Record a successful cycle
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.last_success_at = Some(at);
        self.last_error = None;
        self.consecutive_failures = 0;
    }

    /// Record a failed cycle
    pub fn record_failure(&mut self, at: DateTime<Utc>, error: impl Into<String>) {
        self.last_failure_at = Some(at);
        self.last_error = Some(error.into());
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Whether the most recent cycle succeeded
    #[must_use]
    pub fn last_cycle_succeeded(&self) -> bool {
        match (self.last_success_at, self.last_failure_at) {
            (Some(success), Some(failure)) => success >= failure,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Whether published values come from an earlier cycle than the last one
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.last_success_at.is_some() && !self.last_cycle_succeeded()
    }
}

/// Application service for one configured location
pub struct ForecastService {
    port: Arc<dyn ForecastPort>,
    location: LocationRef,
    snapshot: ArcSwapOption<ForecastSnapshot>,
    status: RwLock<UpdateStatus>,
    refresh_guard: Mutex<()>,
}

impl fmt::Debug for ForecastService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastService")
            .field("location", &self.location)
            .field("has_snapshot", &self.snapshot.load().is_some())
            .finish_non_exhaustive()
    }
}

impl ForecastService {
    /// Create a service for an already resolved location
    #[must_use]
    pub fn new(port: Arc<dyn ForecastPort>, location: LocationRef) -> Self {
        Self {
            port,
            location,
            snapshot: ArcSwapOption::empty(),
            status: RwLock::new(UpdateStatus::default()),
            refresh_guard: Mutex::new(()),
        }
    }

    /// Resolve the settlement and create the service
    ///
    /// A manual location skips the lookup. Any lookup failure is reported
    /// as a resolution error that asks for manual entry.
    #[instrument(skip(port, manual))]
    pub async fn setup(
        port: Arc<dyn ForecastPort>,
        settlement: &str,
        manual: Option<&ManualLocation>,
    ) -> Result<Self, ApplicationError> {
        if settlement.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "settlement name is required".to_string(),
            ));
        }

        let location = if let Some(manual) = manual {
            debug!(code = %manual.code, "Using manually entered location");
            LocationRef::new(settlement, &manual.code, manual.latitude, manual.longitude)?
        } else {
            port.resolve(settlement).await.map_err(|e| {
                warn!(error = %e, "Settlement lookup failed");
                let reason = match e {
                    ApplicationError::Resolution(msg) => msg,
                    other => other.to_string(),
                };
                ApplicationError::Resolution(format!("{reason}; {MANUAL_ENTRY_HINT}"))
            })?
        };

        info!(
            settlement = %location.name(),
            code = %location.code(),
            "Location configured"
        );
        Ok(Self::new(port, location))
    }

    /// The configured location
    #[must_use]
    pub const fn location(&self) -> &LocationRef {
        &self.location
    }

    /// The latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<ForecastSnapshot>> {
        self.snapshot.load_full()
    }

    /// Bookkeeping of past cycles
    #[must_use]
    pub fn status(&self) -> UpdateStatus {
        self.status.read().clone()
    }

    /// Run one update cycle
    ///
    /// Only one cycle runs at a time per location; an overlapping call
    /// returns `RefreshInProgress` without touching the provider.
    #[instrument(skip(self), fields(settlement = %self.location.name()))]
    pub async fn refresh(&self) -> Result<Arc<ForecastSnapshot>, ApplicationError> {
        let Ok(_guard) = self.refresh_guard.try_lock() else {
            debug!("Refresh already running, skipping");
            return Err(ApplicationError::RefreshInProgress);
        };

        match self.port.get_forecast(&self.location).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshot.store(Some(Arc::clone(&snapshot)));
                self.status.write().record_success(Utc::now());
                info!(
                    hourly = snapshot.hourly().len(),
                    daily = snapshot.daily().len(),
                    "Forecast updated"
                );
                Ok(snapshot)
            },
            Err(e) => {
                let failures = {
                    let mut status = self.status.write();
                    status.record_failure(Utc::now(), e.to_string());
                    status.consecutive_failures
                };
                warn!(
                    error = %e,
                    consecutive_failures = failures,
                    "Forecast update failed, keeping previous data"
                );
                Err(e)
            },
        }
    }

    /// Current conditions of the published snapshot
    #[must_use]
    pub fn current_conditions(&self) -> Option<CurrentConditions> {
        self.snapshot()
            .and_then(|snapshot| CurrentConditions::from_snapshot(&snapshot))
    }

    /// Sensor entity states
    #[must_use]
    pub fn sensor_states(&self) -> Vec<SensorState> {
        let snapshot = self.snapshot();
        sensors::sensor_states(&self.location, snapshot.as_deref(), &self.status())
    }

    /// Weather entity state
    #[must_use]
    pub fn weather_state(&self) -> WeatherEntityState {
        let snapshot = self.snapshot();
        sensors::weather_state(&self.location, snapshot.as_deref(), &self.status())
    }
}
