//! Property-based tests for the parsing pipeline
//!
//! These tests use proptest to verify aggregation and mapping invariants
//! across many random inputs.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use domain::{ConditionCode, HourlyRecord, Percentage};
use integration_methu::{aggregate_daily, map_condition, parse_forecast};
use proptest::prelude::*;

fn base() -> DateTime<FixedOffset> {
    #[allow(clippy::expect_used)]
    FixedOffset::east_opt(3600)
        .and_then(|offset| offset.with_ymd_and_hms(2026, 2, 25, 0, 0, 0).single())
        .expect("valid base time")
}

/// Strictly increasing 6-hourly records with random optional fields
fn hourly_strategy() -> impl Strategy<Value = Vec<HourlyRecord>> {
    prop::collection::vec(
        (
            proptest::option::of(-30.0f64..40.0),
            proptest::option::of(0.0f64..30.0),
            proptest::option::of(0u8..=100),
            proptest::option::of(0.0f64..120.0),
        ),
        1..24,
    )
    .prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (temperature, precipitation, probability, wind))| {
                let offset = Duration::hours(6 * i64::try_from(i).unwrap_or(0));
                let mut record = HourlyRecord::empty(base() + offset);
                record.temperature = temperature;
                record.precipitation_mm = precipitation;
                record.precipitation_probability = probability.and_then(|p| Percentage::new(p).ok());
                record.wind_speed_kmh = wind;
                record
            })
            .collect()
    })
}

// ============================================================================
// Aggregator Property Tests
// ============================================================================

mod aggregator_tests {
    use super::*;

    proptest! {
        #[test]
        fn one_day_per_distinct_date_ascending(hourly in hourly_strategy()) {
            let daily = aggregate_daily(&hourly);

            let mut dates: Vec<_> = hourly.iter().map(|r| r.timestamp.date_naive()).collect();
            dates.dedup();
            prop_assert_eq!(daily.len(), dates.len());
            prop_assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
        }

        #[test]
        fn temperature_bounds_come_from_present_values(hourly in hourly_strategy()) {
            for day in aggregate_daily(&hourly) {
                let temps: Vec<f64> = hourly
                    .iter()
                    .filter(|r| r.timestamp.date_naive() == day.date)
                    .filter_map(|r| r.temperature)
                    .collect();

                if temps.is_empty() {
                    prop_assert!(day.temp_min.is_none() && day.temp_max.is_none());
                } else {
                    let min = day.temp_min.unwrap();
                    let max = day.temp_max.unwrap();
                    prop_assert!(min <= max);
                    prop_assert!(temps.iter().all(|t| *t >= min && *t <= max));
                    prop_assert!(temps.contains(&min) && temps.contains(&max));
                }
            }
        }

        #[test]
        fn precipitation_absent_only_without_amounts(hourly in hourly_strategy()) {
            for day in aggregate_daily(&hourly) {
                let any_amount = hourly
                    .iter()
                    .filter(|r| r.timestamp.date_naive() == day.date)
                    .any(|r| r.precipitation_mm.is_some());
                prop_assert_eq!(day.precipitation_mm.is_some(), any_amount);
            }
        }

        #[test]
        fn maxima_never_exceed_inputs(hourly in hourly_strategy()) {
            let top_probability = hourly.iter().filter_map(|r| r.precipitation_probability).max();
            let top_wind = hourly.iter().filter_map(|r| r.wind_speed_kmh).reduce(f64::max);

            for day in aggregate_daily(&hourly) {
                prop_assert!(day.precipitation_probability <= top_probability);
                if let (Some(day_wind), Some(top)) = (day.wind_speed_kmh, top_wind) {
                    prop_assert!(day_wind <= top);
                }
            }
        }

        #[test]
        fn aggregation_is_deterministic(hourly in hourly_strategy()) {
            prop_assert_eq!(aggregate_daily(&hourly), aggregate_daily(&hourly));
        }
    }
}

// ============================================================================
// Condition Mapper Property Tests
// ============================================================================

mod condition_tests {
    use super::*;

    proptest! {
        #[test]
        fn mapping_never_panics(token in "\\PC*") {
            let _ = map_condition(&token);
        }

        #[test]
        fn unknown_tokens_keep_their_text(token in "[qxz]{3,12}") {
            let found = map_condition(&token);
            prop_assert_eq!(found.code, ConditionCode::Unknown);
            prop_assert_eq!(found.description, token);
        }

        #[test]
        fn day_icon_codes_are_known(number in 1u8..=14) {
            let found = map_condition(&format!("{number:02}.gif"));
            prop_assert!(found.is_known());
        }
    }
}

// ============================================================================
// Parser Property Tests
// ============================================================================

mod parser_tests {
    use super::*;

    proptest! {
        #[test]
        fn arbitrary_text_never_panics(html in "\\PC{0,200}") {
            let fetched_at = chrono_tz::Europe::Budapest
                .with_ymd_and_hms(2026, 2, 25, 12, 0, 0)
                .single()
                .unwrap();
            let _ = parse_forecast(&html, fetched_at);
        }

        #[test]
        fn temperature_row_values_survive(temps in prop::collection::vec(-25i32..35, 2..8)) {
            let hours = ["00", "06", "12", "18"];
            let header: String = temps
                .iter()
                .enumerate()
                .map(|(i, _)| format!("<td>{}</td>", hours[i % 4]))
                .collect();
            let cells: String = temps.iter().map(|t| format!("<td>{t}</td>")).collect();
            let html = format!(
                "<table><tr><td></td>{header}</tr><tr><td>Hőmérséklet</td>{cells}</tr></table>"
            );
            let fetched_at = chrono_tz::Europe::Budapest
                .with_ymd_and_hms(2026, 2, 25, 12, 0, 0)
                .single()
                .unwrap();

            let hourly = parse_forecast(&html, fetched_at).unwrap();
            let parsed: Vec<f64> = hourly.iter().filter_map(|r| r.temperature).collect();
            let expected: Vec<f64> = temps.iter().map(|t| f64::from(*t)).collect();
            prop_assert_eq!(parsed, expected);
            prop_assert!(hourly.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        }
    }
}
