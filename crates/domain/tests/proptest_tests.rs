//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{Duration, FixedOffset, TimeZone};
use domain::{ForecastSnapshot, HourlyRecord};
use domain::value_objects::{LocationRef, Percentage, WindDirection};
use proptest::prelude::*;

// ============================================================================
// LocationRef Property Tests
// ============================================================================

mod location_ref_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_triples_create_location(
            code in "[0-9]{1,6}",
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = LocationRef::new("Telepules", code.clone(), lat, lon);
            prop_assert!(loc.is_ok());

            let loc = loc.unwrap();
            prop_assert_eq!(loc.code(), code.as_str());
            prop_assert!((loc.latitude() - lat).abs() < f64::EPSILON);
        }

        #[test]
        fn out_of_range_latitude_rejected(
            lat in prop_oneof![(-1000.0f64..-90.1f64), (90.1f64..1000.0f64)],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(LocationRef::new("x", "1", lat, lon).is_err());
        }

        #[test]
        fn blank_code_rejected(code in "[ \t]{0,4}") {
            prop_assert!(LocationRef::new("x", code, 47.0, 19.0).is_err());
        }
    }
}

// ============================================================================
// Percentage Property Tests
// ============================================================================

mod percentage_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_range_accepted(value in 0u8..=100u8) {
            let p = Percentage::new(value);
            prop_assert!(p.is_ok());
            prop_assert_eq!(p.unwrap().value(), value);
        }

        #[test]
        fn above_hundred_rejected(value in 101u8..=255u8) {
            prop_assert!(Percentage::new(value).is_err());
        }

        #[test]
        fn readings_never_escape_range(value in -1000.0f64..1000.0f64) {
            if let Some(p) = Percentage::from_reading(value) {
                prop_assert!(p.value() <= 100);
                prop_assert!((f64::from(p.value()) - value).abs() <= 0.5);
            }
        }
    }
}

// ============================================================================
// WindDirection Property Tests
// ============================================================================

mod wind_direction_tests {
    use super::*;

    proptest! {
        #[test]
        fn parsing_arbitrary_text_never_panics(token in "\\PC{0,12}") {
            let _ = WindDirection::from_abbreviation(&token);
        }

        #[test]
        fn abbreviation_round_trips(index in 0usize..8) {
            let direction = WindDirection::ALL[index];
            prop_assert_eq!(WindDirection::from_abbreviation(direction.as_str()), Some(direction));
            prop_assert!(direction.bearing() < 360);
        }
    }
}

// ============================================================================
// ForecastSnapshot Property Tests
// ============================================================================

mod snapshot_tests {
    use super::*;

    proptest! {
        #[test]
        fn current_is_never_after_fetch_unless_first(
            periods in 1usize..16,
            fetch_offset_hours in -12i64..120
        ) {
            let tz = FixedOffset::east_opt(3600).unwrap();
            let start = tz.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
            let hourly: Vec<HourlyRecord> = (0..periods)
                .map(|i| {
                    let mut r = HourlyRecord::empty(start + Duration::hours(6 * i as i64));
                    r.temperature = Some(i as f64);
                    r
                })
                .collect();
            let fetched_at = start + Duration::hours(fetch_offset_hours);
            let location = LocationRef::new("Budapest", "13578", 47.5, 19.04).unwrap();

            let snapshot = ForecastSnapshot::new(location, fetched_at, hourly, vec![]).unwrap();
            let current = snapshot.current().unwrap();

            if fetched_at >= start {
                prop_assert!(current.timestamp <= fetched_at);
            } else {
                prop_assert_eq!(current.timestamp, start);
            }
        }
    }
}
