//! Daily roll-up of forecast periods

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_objects::{ConditionCode, Percentage, WindDirection};

/// One calendar day derived from the hourly sequence
///
/// Never parsed directly; produced by the aggregator, one per distinct
/// date, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Local calendar date
    pub date: NaiveDate,
    /// Lowest present temperature
    pub temp_min: Option<f64>,
    /// Highest present temperature
    pub temp_max: Option<f64>,
    /// Mean of present temperatures, one decimal
    pub temp_avg: Option<f64>,
    /// Summed precipitation in mm, one decimal
    pub precipitation_mm: Option<f64>,
    /// Highest precipitation probability of the day
    pub precipitation_probability: Option<Percentage>,
    /// Highest wind speed of the day in km/h
    pub wind_speed_kmh: Option<f64>,
    /// Wind direction of the representative period
    pub wind_direction: Option<WindDirection>,
    /// Humidity of the representative period
    pub humidity: Option<Percentage>,
    /// Condition of the representative period
    pub condition: ConditionCode,
    /// Description of the representative period
    pub description: String,
}
