//! Host-facing entity view of a forecast
//!
//! Turns the published snapshot into what a home-automation host shows:
//! one state per sensor with its forecast attribute lists, and a single
//! weather entity. Values of a failed cycle stay those of the last good
//! snapshot; `available` and `stale` tell the host that they are old.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use domain::{
    ConditionCode, DailyRecord, ForecastSnapshot, HourlyRecord, LocationRef, Percentage,
    WindDirection,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::services::UpdateStatus;

/// Identifier prefix for entity unique ids
pub const ENTITY_DOMAIN: &str = "methu_forecast";

/// Attribution shown with the weather entity
pub const ATTRIBUTION: &str = "Weather data from HungaroMet (met.hu)";

/// Conditions "now": the current period plus today's extremes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Start of the period describing now
    pub forecast_time: DateTime<FixedOffset>,
    /// Temperature in °C
    pub temperature: Option<f64>,
    /// Today's lowest temperature in °C
    pub temperature_min: Option<f64>,
    /// Today's highest temperature in °C
    pub temperature_max: Option<f64>,
    /// Precipitation of the period in mm
    pub precipitation_mm: Option<f64>,
    /// Precipitation probability of the period
    pub precipitation_probability: Option<Percentage>,
    /// Wind speed in km/h
    pub wind_speed_kmh: Option<f64>,
    /// Wind direction
    pub wind_direction: Option<WindDirection>,
    /// Relative humidity
    pub humidity: Option<Percentage>,
    /// Mapped condition
    pub condition: ConditionCode,
    /// Provider description
    pub description: String,
}

impl CurrentConditions {
    /// Derive the current conditions of a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: &ForecastSnapshot) -> Option<Self> {
        let current = snapshot.current()?;
        let today = snapshot.today();

        Some(Self {
            forecast_time: current.timestamp,
            temperature: current.temperature,
            temperature_min: today.and_then(|d| d.temp_min),
            temperature_max: today.and_then(|d| d.temp_max),
            precipitation_mm: current.precipitation_mm,
            precipitation_probability: current.precipitation_probability,
            wind_speed_kmh: current.wind_speed_kmh,
            wind_direction: current.wind_direction,
            humidity: current.humidity,
            condition: current.condition,
            description: current.description.clone(),
        })
    }

    fn fields(&self) -> Fields<'_> {
        Fields {
            temperature: self.temperature,
            temperature_min: self.temperature_min,
            temperature_max: self.temperature_max,
            precipitation_mm: self.precipitation_mm,
            precipitation_probability: self.precipitation_probability,
            wind_speed_kmh: self.wind_speed_kmh,
            wind_direction: self.wind_direction,
            humidity: self.humidity,
            condition: self.condition,
            description: &self.description,
        }
    }
}

/// Common view over current, hourly and daily values
struct Fields<'a> {
    temperature: Option<f64>,
    temperature_min: Option<f64>,
    temperature_max: Option<f64>,
    precipitation_mm: Option<f64>,
    precipitation_probability: Option<Percentage>,
    wind_speed_kmh: Option<f64>,
    wind_direction: Option<WindDirection>,
    humidity: Option<Percentage>,
    condition: ConditionCode,
    description: &'a str,
}

impl<'a> From<&'a HourlyRecord> for Fields<'a> {
    fn from(record: &'a HourlyRecord) -> Self {
        Self {
            temperature: record.temperature,
            temperature_min: None,
            temperature_max: None,
            precipitation_mm: record.precipitation_mm,
            precipitation_probability: record.precipitation_probability,
            wind_speed_kmh: record.wind_speed_kmh,
            wind_direction: record.wind_direction,
            humidity: record.humidity,
            condition: record.condition,
            description: &record.description,
        }
    }
}

impl<'a> From<&'a DailyRecord> for Fields<'a> {
    fn from(record: &'a DailyRecord) -> Self {
        Self {
            temperature: record.temp_avg,
            temperature_min: record.temp_min,
            temperature_max: record.temp_max,
            precipitation_mm: record.precipitation_mm,
            precipitation_probability: record.precipitation_probability,
            wind_speed_kmh: record.wind_speed_kmh,
            wind_direction: record.wind_direction,
            humidity: record.humidity,
            condition: record.condition,
            description: &record.description,
        }
    }
}

/// Value of a sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    /// Numeric reading
    Number(f64),
    /// Textual state
    Text(String),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Sensors exposed per configured location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Current temperature
    Temperature,
    /// Today's minimum temperature
    TemperatureMin,
    /// Today's maximum temperature
    TemperatureMax,
    /// Precipitation amount
    Precipitation,
    /// Precipitation probability
    PrecipitationProbability,
    /// Wind speed
    WindSpeed,
    /// 8-point wind direction
    WindDirection,
    /// Wind bearing in degrees
    WindBearing,
    /// Relative humidity
    Humidity,
    /// Standard condition code
    WeatherCondition,
    /// Provider description
    WeatherDescription,
}

impl SensorKind {
    /// Every sensor, in display order
    pub const ALL: [Self; 11] = [
        Self::Temperature,
        Self::TemperatureMin,
        Self::TemperatureMax,
        Self::Precipitation,
        Self::PrecipitationProbability,
        Self::WindSpeed,
        Self::WindDirection,
        Self::WindBearing,
        Self::Humidity,
        Self::WeatherCondition,
        Self::WeatherDescription,
    ];

    /// Stable key used in entity ids
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::TemperatureMin => "temperature_min",
            Self::TemperatureMax => "temperature_max",
            Self::Precipitation => "precipitation",
            Self::PrecipitationProbability => "precipitation_probability",
            Self::WindSpeed => "wind_speed",
            Self::WindDirection => "wind_direction",
            Self::WindBearing => "wind_bearing",
            Self::Humidity => "humidity",
            Self::WeatherCondition => "weather_condition",
            Self::WeatherDescription => "weather_description",
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::TemperatureMin => "Temperature Min",
            Self::TemperatureMax => "Temperature Max",
            Self::Precipitation => "Precipitation",
            Self::PrecipitationProbability => "Precipitation Probability",
            Self::WindSpeed => "Wind Speed",
            Self::WindDirection => "Wind Direction",
            Self::WindBearing => "Wind Bearing",
            Self::Humidity => "Humidity",
            Self::WeatherCondition => "Weather Condition",
            Self::WeatherDescription => "Weather Description",
        }
    }

    /// Unit of measurement, if any
    #[must_use]
    pub const fn unit(self) -> Option<&'static str> {
        match self {
            Self::Temperature | Self::TemperatureMin | Self::TemperatureMax => Some("°C"),
            Self::Precipitation => Some("mm"),
            Self::PrecipitationProbability | Self::Humidity => Some("%"),
            Self::WindSpeed => Some("km/h"),
            Self::WindBearing => Some("°"),
            Self::WindDirection | Self::WeatherCondition | Self::WeatherDescription => None,
        }
    }

    /// Material Design icon name
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Temperature => "mdi:thermometer",
            Self::TemperatureMin => "mdi:thermometer-chevron-down",
            Self::TemperatureMax => "mdi:thermometer-chevron-up",
            Self::Precipitation => "mdi:weather-rainy",
            Self::PrecipitationProbability => "mdi:water-percent",
            Self::WindSpeed => "mdi:weather-windy",
            Self::WindDirection => "mdi:compass-rose",
            Self::WindBearing => "mdi:compass",
            Self::Humidity => "mdi:water",
            Self::WeatherCondition => "mdi:weather-partly-cloudy",
            Self::WeatherDescription => "mdi:text-short",
        }
    }

    fn pick(self, fields: &Fields<'_>) -> Option<SensorValue> {
        let number = |value: Option<f64>| value.map(SensorValue::Number);
        let percent = |value: Option<Percentage>| value.map(|p| SensorValue::Number(f64::from(p.value())));

        match self {
            Self::Temperature => number(fields.temperature),
            Self::TemperatureMin => number(fields.temperature_min),
            Self::TemperatureMax => number(fields.temperature_max),
            Self::Precipitation => number(fields.precipitation_mm),
            Self::PrecipitationProbability => percent(fields.precipitation_probability),
            Self::WindSpeed => number(fields.wind_speed_kmh),
            Self::WindDirection => fields
                .wind_direction
                .map(|d| SensorValue::Text(d.as_str().to_string())),
            Self::WindBearing => fields
                .wind_direction
                .map(|d| SensorValue::Number(f64::from(d.bearing()))),
            Self::Humidity => percent(fields.humidity),
            Self::WeatherCondition => Some(SensorValue::Text(fields.condition.as_str().to_string())),
            Self::WeatherDescription => (!fields.description.is_empty())
                .then(|| SensorValue::Text(fields.description.to_string())),
        }
    }

    /// Value of this sensor for the current conditions
    #[must_use]
    pub fn current_value(self, current: &CurrentConditions) -> Option<SensorValue> {
        self.pick(&current.fields())
    }

    /// Value of this sensor for one forecast period
    #[must_use]
    pub fn hourly_value(self, record: &HourlyRecord) -> Option<SensorValue> {
        self.pick(&Fields::from(record))
    }

    /// Value of this sensor for one forecast day
    #[must_use]
    pub fn daily_value(self, record: &DailyRecord) -> Option<SensorValue> {
        self.pick(&Fields::from(record))
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One entry of a sensor's hourly forecast attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    /// Period start
    pub time: DateTime<FixedOffset>,
    /// Sensor value in that period
    pub value: SensorValue,
}

/// One entry of a sensor's daily forecast attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    /// Calendar date
    pub date: NaiveDate,
    /// Sensor value on that day
    pub value: SensorValue,
}

/// Extra attributes published with each sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorAttributes {
    /// Settlement name
    pub settlement: String,
    /// Start of the period the value belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_time: Option<DateTime<FixedOffset>>,
    /// When the published snapshot was fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<FixedOffset>>,
    /// Values per period, absent values omitted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hourly_forecast: Vec<TimedValue>,
    /// Values per day, absent values omitted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daily_forecast: Vec<DatedValue>,
}

/// State of one sensor entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    /// Which sensor this is
    pub kind: SensorKind,
    /// Stable entity id
    pub unique_id: String,
    /// Display name
    pub name: String,
    /// Current value; kept from the last good snapshot after a failure
    pub value: Option<SensorValue>,
    /// Unit of measurement
    pub unit: Option<String>,
    /// Icon name
    pub icon: String,
    /// A snapshot exists and the last cycle succeeded
    pub available: bool,
    /// The last cycle failed and the value is from an earlier one
    pub stale: bool,
    /// Extra attributes
    pub attributes: SensorAttributes,
}

/// One entry of the weather entity's forecast lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// RFC 3339 period start, or ISO date for daily entries
    pub datetime: String,
    /// Mapped condition
    pub condition: ConditionCode,
    /// Temperature (daily: mean) in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Daily low in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templow: Option<f64>,
    /// Daily high in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temphigh: Option<f64>,
    /// Precipitation in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Precipitation probability in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<u8>,
    /// Wind speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Wind bearing in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_bearing: Option<u16>,
}

impl From<&HourlyRecord> for ForecastEntry {
    fn from(record: &HourlyRecord) -> Self {
        Self {
            datetime: record.timestamp.to_rfc3339(),
            condition: record.condition,
            temperature: record.temperature,
            templow: None,
            temphigh: None,
            precipitation: record.precipitation_mm,
            precipitation_probability: record.precipitation_probability.map(Percentage::value),
            wind_speed: record.wind_speed_kmh,
            wind_bearing: record.wind_direction.map(WindDirection::bearing),
        }
    }
}

impl From<&DailyRecord> for ForecastEntry {
    fn from(record: &DailyRecord) -> Self {
        Self {
            datetime: record.date.to_string(),
            condition: record.condition,
            temperature: record.temp_avg,
            templow: record.temp_min,
            temphigh: record.temp_max,
            precipitation: record.precipitation_mm,
            precipitation_probability: record.precipitation_probability.map(Percentage::value),
            wind_speed: record.wind_speed_kmh,
            wind_bearing: record.wind_direction.map(WindDirection::bearing),
        }
    }
}

/// State of the weather entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEntityState {
    /// Stable entity id
    pub unique_id: String,
    /// Display name
    pub name: String,
    /// Current condition
    pub condition: Option<ConditionCode>,
    /// Current temperature in °C
    pub temperature: Option<f64>,
    /// Current humidity in percent
    pub humidity: Option<u8>,
    /// Current wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Current wind bearing in degrees
    pub wind_bearing: Option<u16>,
    /// Current precipitation in mm
    pub precipitation: Option<f64>,
    /// Per-period forecast
    pub hourly_forecast: Vec<ForecastEntry>,
    /// Per-day forecast
    pub daily_forecast: Vec<ForecastEntry>,
    /// A snapshot exists and the last cycle succeeded
    pub available: bool,
    /// The last cycle failed and the data is from an earlier one
    pub stale: bool,
    /// Data source attribution
    pub attribution: String,
    /// When the published snapshot was fetched
    pub last_updated: Option<DateTime<Utc>>,
}

/// Lower-case settlement slug for entity ids
fn slug(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

/// Build one state per sensor kind
#[must_use]
pub fn sensor_states(
    location: &LocationRef,
    snapshot: Option<&ForecastSnapshot>,
    status: &UpdateStatus,
) -> Vec<SensorState> {
    let current = snapshot.and_then(CurrentConditions::from_snapshot);
    let available = snapshot.is_some() && status.last_cycle_succeeded();
    let stale = snapshot.is_some() && !status.last_cycle_succeeded();
    let prefix = slug(location.name());

    SensorKind::ALL
        .iter()
        .map(|&kind| {
            let hourly_forecast = snapshot
                .map(|s| {
                    s.hourly()
                        .iter()
                        .filter_map(|r| {
                            kind.hourly_value(r).map(|value| TimedValue {
                                time: r.timestamp,
                                value,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            let daily_forecast = snapshot
                .map(|s| {
                    s.daily()
                        .iter()
                        .filter_map(|d| {
                            kind.daily_value(d).map(|value| DatedValue {
                                date: d.date,
                                value,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            SensorState {
                kind,
                unique_id: format!("{ENTITY_DOMAIN}_{prefix}_{}", kind.key()),
                name: format!("{} {}", location.name(), kind.name()),
                value: current.as_ref().and_then(|c| kind.current_value(c)),
                unit: kind.unit().map(str::to_string),
                icon: kind.icon().to_string(),
                available,
                stale,
                attributes: SensorAttributes {
                    settlement: location.name().to_string(),
                    forecast_time: current.as_ref().map(|c| c.forecast_time),
                    last_updated: snapshot.map(ForecastSnapshot::fetched_at),
                    hourly_forecast,
                    daily_forecast,
                },
            }
        })
        .collect()
}

/// Build the weather entity state
#[must_use]
pub fn weather_state(
    location: &LocationRef,
    snapshot: Option<&ForecastSnapshot>,
    status: &UpdateStatus,
) -> WeatherEntityState {
    let current = snapshot.and_then(CurrentConditions::from_snapshot);

    WeatherEntityState {
        unique_id: format!("{ENTITY_DOMAIN}_{}_weather", slug(location.name())),
        name: format!("HungaroMet {}", location.name()),
        condition: current.as_ref().map(|c| c.condition),
        temperature: current.as_ref().and_then(|c| c.temperature),
        humidity: current.as_ref().and_then(|c| c.humidity).map(Percentage::value),
        wind_speed: current.as_ref().and_then(|c| c.wind_speed_kmh),
        wind_bearing: current
            .as_ref()
            .and_then(|c| c.wind_direction)
            .map(WindDirection::bearing),
        precipitation: current.as_ref().and_then(|c| c.precipitation_mm),
        hourly_forecast: snapshot
            .map(|s| s.hourly().iter().map(ForecastEntry::from).collect())
            .unwrap_or_default(),
        daily_forecast: snapshot
            .map(|s| s.daily().iter().map(ForecastEntry::from).collect())
            .unwrap_or_default(),
        available: snapshot.is_some() && status.last_cycle_succeeded(),
        stale: snapshot.is_some() && !status.last_cycle_succeeded(),
        attribution: ATTRIBUTION.to_string(),
        last_updated: status.last_success_at,
    }
}
