//! Resolved settlement reference

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A settlement resolved to the provider's identifiers
///
/// Created once at setup, either from the autocomplete lookup or from
/// manual entry, and held unchanged for the lifetime of a configured
/// location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocationRef")]
pub struct LocationRef {
    /// Display name as accepted by the provider (diacritics included)
    name: String,
    /// Provider settlement code (`kod`)
    code: String,
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl LocationRef {
    /// Create a new location reference with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` if the code is blank, or the
    /// coordinates are not finite or outside [-90, 90] / [-180, 180].
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, DomainError> {
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err(DomainError::invalid_location("settlement code is empty"));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::invalid_location(format!(
                "latitude {latitude} must be -90 to 90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::invalid_location(format!(
                "longitude {longitude} must be -180 to 180"
            )));
        }

        Ok(Self {
            name: name.into().trim().to_string(),
            code,
            latitude,
            longitude,
        })
    }

    /// Get the settlement name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the provider settlement code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Unvalidated wire form, checked through `LocationRef::new`
#[derive(Deserialize)]
struct RawLocationRef {
    name: String,
    code: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocationRef> for LocationRef {
    type Error = DomainError;

    fn try_from(raw: RawLocationRef) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.code, raw.latitude, raw.longitude)
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (kod={}, {:.4}, {:.4})",
            self.name, self.code, self.latitude, self.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_location() {
        let loc = LocationRef::new("Budapest", "13578", 47.4979, 19.0402).expect("valid");
        assert_eq!(loc.name(), "Budapest");
        assert_eq!(loc.code(), "13578");
        assert!((loc.latitude() - 47.4979).abs() < f64::EPSILON);
        assert!((loc.longitude() - 19.0402).abs() < f64::EPSILON);
    }

    #[test]
    fn test_code_is_trimmed() {
        let loc = LocationRef::new("Győr", " 4001 ", 47.68, 17.63).expect("valid");
        assert_eq!(loc.code(), "4001");
    }

    #[test]
    fn test_empty_code_rejected() {
        let err = LocationRef::new("Budapest", "  ", 47.5, 19.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidLocation(_)));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        assert!(LocationRef::new("x", "1", 91.0, 19.0).is_err());
        assert!(LocationRef::new("x", "1", 47.0, -181.0).is_err());
        assert!(LocationRef::new("x", "1", f64::NAN, 19.0).is_err());
        assert!(LocationRef::new("x", "1", 47.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        let loc = LocationRef::new("Szeged", "2010", 46.253, 20.1414).expect("valid");
        let display = loc.to_string();
        assert!(display.contains("Szeged"));
        assert!(display.contains("kod=2010"));
    }

    #[test]
    fn test_serialization() {
        let loc = LocationRef::new("Pécs", "5551", 46.0727, 18.2323).expect("valid");
        let json = serde_json::to_string(&loc).expect("serialize");
        assert!(json.contains("Pécs"));

        let deserialized: LocationRef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loc, deserialized);
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"name":"Pécs","code":"","latitude":46.07,"longitude":18.23}"#;
        assert!(serde_json::from_str::<LocationRef>(json).is_err());

        let json = r#"{"name":"Pécs","code":"5551","latitude":146.07,"longitude":18.23}"#;
        assert!(serde_json::from_str::<LocationRef>(json).is_err());
    }
}
