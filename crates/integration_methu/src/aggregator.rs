//! Daily roll-up of the 6-hourly sequence

use chrono::{NaiveDate, Timelike};
use domain::{DailyRecord, HourlyRecord};
use std::collections::BTreeMap;

/// Local midday in minutes after midnight
const MIDDAY_MINUTES: i64 = 12 * 60;

/// Periods further than this from midday never represent their day
const MIDDAY_WINDOW_MINUTES: i64 = 6 * 60;

/// Round to one decimal place
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fold the hourly sequence into one record per local calendar date
///
/// Temperatures, probabilities and wind speeds only consider present
/// values. The precipitation total treats absent periods as zero and is
/// itself absent only when no period of the day reports an amount.
/// Condition, description, wind direction and humidity come from the
/// period closest to local midday (within six hours, earliest on a tie),
/// else from the first period of the day.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use domain::HourlyRecord;
/// use integration_methu::aggregate_daily;
///
/// let mut morning = HourlyRecord::empty(DateTime::parse_from_rfc3339("2026-02-25T06:00:00+01:00").unwrap());
/// morning.temperature = Some(5.0);
/// let mut noon = HourlyRecord::empty(DateTime::parse_from_rfc3339("2026-02-25T12:00:00+01:00").unwrap());
/// noon.temperature = Some(12.0);
///
/// let daily = aggregate_daily(&[morning, noon]);
/// assert_eq!(daily.len(), 1);
/// assert_eq!(daily[0].temp_min, Some(5.0));
/// assert_eq!(daily[0].temp_max, Some(12.0));
/// ```
#[must_use]
pub fn aggregate_daily(hourly: &[HourlyRecord]) -> Vec<DailyRecord> {
    let mut days: BTreeMap<NaiveDate, Vec<&HourlyRecord>> = BTreeMap::new();
    for record in hourly {
        days.entry(record.timestamp.date_naive())
            .or_default()
            .push(record);
    }

    days.into_iter()
        .filter_map(|(date, records)| aggregate_day(date, &records))
        .collect()
}

fn aggregate_day(date: NaiveDate, records: &[&HourlyRecord]) -> Option<DailyRecord> {
    let representative = representative(records)?;

    let temperatures: Vec<f64> = records.iter().filter_map(|r| r.temperature).collect();
    let temp_min = temperatures.iter().copied().reduce(f64::min);
    let temp_max = temperatures.iter().copied().reduce(f64::max);
    #[allow(clippy::cast_precision_loss)] // A day holds a handful of periods
    let temp_avg = (!temperatures.is_empty())
        .then(|| round_tenth(temperatures.iter().sum::<f64>() / temperatures.len() as f64));

    let precipitation_mm = records
        .iter()
        .filter_map(|r| r.precipitation_mm)
        .reduce(|total, amount| total + amount)
        .map(round_tenth);

    Some(DailyRecord {
        date,
        temp_min,
        temp_max,
        temp_avg,
        precipitation_mm,
        precipitation_probability: records.iter().filter_map(|r| r.precipitation_probability).max(),
        wind_speed_kmh: records.iter().filter_map(|r| r.wind_speed_kmh).reduce(f64::max),
        wind_direction: representative.wind_direction,
        humidity: representative.humidity,
        condition: representative.condition,
        description: representative.description.clone(),
    })
}

/// Period nearest local midday, else the first of the day
fn representative<'a>(records: &[&'a HourlyRecord]) -> Option<&'a HourlyRecord> {
    records
        .iter()
        .copied()
        .filter_map(|record| {
            let minutes = i64::from(record.timestamp.hour() * 60 + record.timestamp.minute());
            let distance = (minutes - MIDDAY_MINUTES).abs();
            (distance <= MIDDAY_WINDOW_MINUTES).then_some((distance, record))
        })
        .min_by(|(da, a), (db, b)| da.cmp(db).then(a.timestamp.cmp(&b.timestamp)))
        .map(|(_, record)| record)
        .or_else(|| records.first().copied())
}
