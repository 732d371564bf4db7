//! Standard weather condition vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-agnostic weather condition
///
/// Every provider description degrades to one of these; anything the
/// mapping tables do not know becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCode {
    /// Clear sky during the day
    Clear,
    /// Clear sky at night
    ClearNight,
    /// Partly cloudy
    PartlyCloudy,
    /// Overcast
    Cloudy,
    /// Rain or showers
    Rain,
    /// Heavy rain
    Pouring,
    /// Snow
    Snow,
    /// Mixed rain and snow
    Sleet,
    /// Hail
    Hail,
    /// Fog or mist
    Fog,
    /// Thunderstorm
    Thunderstorm,
    /// Strong wind
    Windy,
    /// Unmapped provider description
    #[default]
    Unknown,
}

impl ConditionCode {
    /// Stable identifier used by sensors and serialisation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::ClearNight => "clear-night",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Pouring => "pouring",
            Self::Snow => "snow",
            Self::Sleet => "sleet",
            Self::Hail => "hail",
            Self::Fog => "fog",
            Self::Thunderstorm => "thunderstorm",
            Self::Windy => "windy",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the condition involves falling precipitation
    #[must_use]
    pub const fn is_precipitation(self) -> bool {
        matches!(
            self,
            Self::Rain | Self::Pouring | Self::Snow | Self::Sleet | Self::Hail | Self::Thunderstorm
        )
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
