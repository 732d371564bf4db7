//! One 6-hourly forecast period

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ConditionCode, Percentage, WindDirection};

/// A single forecast period as parsed from the provider table
///
/// Numeric fields are optional: `None` means the cell was missing or could
/// not be parsed, never a zero reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Zone-aware start of the period
    pub timestamp: DateTime<FixedOffset>,
    /// Air temperature in °C
    pub temperature: Option<f64>,
    /// Precipitation amount in mm
    pub precipitation_mm: Option<f64>,
    /// Precipitation probability
    pub precipitation_probability: Option<Percentage>,
    /// Wind speed in km/h
    pub wind_speed_kmh: Option<f64>,
    /// Wind direction
    pub wind_direction: Option<WindDirection>,
    /// Relative humidity
    pub humidity: Option<Percentage>,
    /// Mapped condition
    pub condition: ConditionCode,
    /// Human-readable description of the condition
    pub description: String,
}

impl HourlyRecord {
    /// Create an empty record for the given period start
    #[must_use]
    pub const fn empty(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            temperature: None,
            precipitation_mm: None,
            precipitation_probability: None,
            wind_speed_kmh: None,
            wind_direction: None,
            humidity: None,
            condition: ConditionCode::Unknown,
            description: String::new(),
        }
    }

    /// Whether at least one field carries information
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.temperature.is_some()
            || self.precipitation_mm.is_some()
            || self.precipitation_probability.is_some()
            || self.wind_speed_kmh.is_some()
            || self.wind_direction.is_some()
            || self.humidity.is_some()
            || self.condition != ConditionCode::Unknown
            || !self.description.is_empty()
    }
}
