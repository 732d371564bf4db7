//! Percentage value object
//!
//! A validated whole-number percentage (0-100%), used for relative
//! humidity and precipitation probability.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::Percentage;
//!
//! let p = Percentage::new(65).expect("valid percentage");
//! assert_eq!(p.value(), 65);
//! assert!(Percentage::new(101).is_err());
//! assert_eq!(Percentage::from_reading(64.6).map(Percentage::value), Some(65));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Whole-number percentage (0-100%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Percentage(u8);

impl Percentage {
    /// Maximum valid percentage
    pub const MAX: u8 = 100;

    /// Create a new validated percentage
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPercentage` if the value is greater than 100.
    pub const fn new(value: u8) -> Result<Self, DomainError> {
        if value > Self::MAX {
            Err(DomainError::InvalidPercentage(value as i64))
        } else {
            Ok(Self(value))
        }
    }

    /// Convert a parsed numeric reading into a percentage
    ///
    /// Rounds to the nearest whole number; non-finite or out-of-range
    /// readings yield `None` rather than a clamped value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_reading(value: f64) -> Option<Self> {
        let rounded = value.round();
        if rounded.is_finite() && (0.0..=f64::from(Self::MAX)).contains(&rounded) {
            Some(Self(rounded as u8))
        } else {
            None
        }
    }

    /// Get the percentage as a u8
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percentage {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
