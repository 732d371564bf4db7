//! Forecast snapshot published after a successful update cycle

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{DailyRecord, HourlyRecord};
use crate::errors::DomainError;
use crate::value_objects::LocationRef;

/// Result of one successful fetch → parse → aggregate cycle
///
/// Construction enforces the publishing invariants: the hourly sequence
/// is non-empty with strictly increasing timestamps and the daily sequence
/// has strictly increasing dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForecastSnapshot")]
pub struct ForecastSnapshot {
    location: LocationRef,
    fetched_at: DateTime<FixedOffset>,
    hourly: Vec<HourlyRecord>,
    daily: Vec<DailyRecord>,
}

/// Unvalidated wire form, checked through `ForecastSnapshot::new`
#[derive(Deserialize)]
struct RawForecastSnapshot {
    location: LocationRef,
    fetched_at: DateTime<FixedOffset>,
    hourly: Vec<HourlyRecord>,
    daily: Vec<DailyRecord>,
}

impl TryFrom<RawForecastSnapshot> for ForecastSnapshot {
    type Error = DomainError;

    fn try_from(raw: RawForecastSnapshot) -> Result<Self, Self::Error> {
        Self::new(raw.location, raw.fetched_at, raw.hourly, raw.daily)
    }
}

impl ForecastSnapshot {
    /// Create a snapshot, validating ordering and emptiness
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidForecast` if the hourly sequence is empty
    /// or either sequence is not strictly increasing.
    pub fn new(
        location: LocationRef,
        fetched_at: DateTime<FixedOffset>,
        hourly: Vec<HourlyRecord>,
        daily: Vec<DailyRecord>,
    ) -> Result<Self, DomainError> {
        if hourly.is_empty() {
            return Err(DomainError::invalid_forecast("hourly sequence is empty"));
        }
        if hourly.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(DomainError::invalid_forecast(
                "hourly timestamps are not strictly increasing",
            ));
        }
        if daily.windows(2).any(|w| w[0].date >= w[1].date) {
            return Err(DomainError::invalid_forecast(
                "daily dates are not strictly increasing",
            ));
        }

        Ok(Self {
            location,
            fetched_at,
            hourly,
            daily,
        })
    }

    /// Location the forecast belongs to
    #[must_use]
    pub const fn location(&self) -> &LocationRef {
        &self.location
    }

    /// When the document was fetched
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<FixedOffset> {
        self.fetched_at
    }

    /// Hourly sequence, ascending
    #[must_use]
    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    /// Daily sequence, ascending
    #[must_use]
    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    /// The period describing "now"
    ///
    /// The latest period starting at or before the fetch time; when the
    /// table starts in the future, the first period.
    #[must_use]
    pub fn current(&self) -> Option<&HourlyRecord> {
        self.hourly
            .iter()
            .take_while(|record| record.timestamp <= self.fetched_at)
            .last()
            .or_else(|| self.hourly.first())
    }

    /// The daily record for the fetch date, else the first day
    #[must_use]
    pub fn today(&self) -> Option<&DailyRecord> {
        let date = self.current()?.timestamp.date_naive();
        self.daily
            .iter()
            .find(|day| day.date == date)
            .or_else(|| self.daily.first())
    }
}
