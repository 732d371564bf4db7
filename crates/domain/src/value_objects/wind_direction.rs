//! Eight-point compass wind direction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wind direction on the 8-point compass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
}

impl WindDirection {
    /// All directions, clockwise from north
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Parse a compass abbreviation, Hungarian or English
    ///
    /// Accepts the 8-point forms (`É`, `ÉK`, `DNy`, `N`, `SW`, ...) as well as
    /// 16-point forms, which resolve to their intercardinal neighbour
    /// (`ÉÉK` and `NNE` become north-east). Calm, variable and anything
    /// unrecognised yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::value_objects::WindDirection;
    ///
    /// assert_eq!(WindDirection::from_abbreviation("DNy"), Some(WindDirection::SouthWest));
    /// assert_eq!(WindDirection::from_abbreviation("NNE"), Some(WindDirection::NorthEast));
    /// assert_eq!(WindDirection::from_abbreviation("szélcsend"), None);
    /// ```
    #[must_use]
    pub fn from_abbreviation(token: &str) -> Option<Self> {
        let token = token.trim().trim_end_matches('.').to_lowercase();
        let direction = match token.as_str() {
            "é" | "n" | "észak" | "északi" | "north" => Self::North,
            "ék" | "ne" | "éék" | "kék" | "nne" | "ene" | "északkeleti" => Self::NorthEast,
            "k" | "e" | "kelet" | "keleti" | "east" => Self::East,
            "dk" | "se" | "kdk" | "ddk" | "ese" | "sse" | "délkeleti" => Self::SouthEast,
            "d" | "s" | "dél" | "déli" | "south" => Self::South,
            "dny" | "sw" | "ddny" | "nydny" | "ssw" | "wsw" | "délnyugati" => Self::SouthWest,
            "ny" | "w" | "nyugat" | "nyugati" | "west" => Self::West,
            "ény" | "nw" | "nyény" | "éény" | "wnw" | "nnw" | "északnyugati" => Self::NorthWest,
            _ => return None,
        };
        Some(direction)
    }

    /// Bearing of the direction in degrees (0 = north, clockwise)
    #[must_use]
    pub const fn bearing(self) -> u16 {
        match self {
            Self::North => 0,
            Self::NorthEast => 45,
            Self::East => 90,
            Self::SouthEast => 135,
            Self::South => 180,
            Self::SouthWest => 225,
            Self::West => 270,
            Self::NorthWest => 315,
        }
    }

    /// English compass abbreviation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
