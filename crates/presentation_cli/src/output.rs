//! Plain-text rendering of forecasts and entity states

use std::fmt::Write;

use application::{CurrentConditions, SensorState};
use domain::{ForecastSnapshot, LocationRef};

/// Placeholder for an absent value
const ABSENT: &str = "-";

fn number(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{v:.1}{unit}"))
}

fn percent(value: Option<domain::Percentage>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |p| format!("{}%", p.value()))
}

/// One-line description of a resolved location
#[must_use]
pub fn render_location(location: &LocationRef) -> String {
    format!(
        "{} (code {}, lat {}, lon {})",
        location.name(),
        location.code(),
        location.latitude(),
        location.longitude()
    )
}

/// Current conditions plus the daily table
#[must_use]
pub fn render_forecast(snapshot: &ForecastSnapshot) -> String {
    let mut out = format!(
        "{}\nFetched {}\n",
        render_location(snapshot.location()),
        snapshot.fetched_at().format("%Y-%m-%d %H:%M %:z")
    );

    if let Some(now) = CurrentConditions::from_snapshot(snapshot) {
        let _ = writeln!(
            out,
            "\nNow ({}): {} | {} | wind {} {} | precip {} ({})",
            now.forecast_time.format("%a %H:%M"),
            if now.description.is_empty() {
                now.condition.as_str()
            } else {
                now.description.as_str()
            },
            number(now.temperature, " °C"),
            number(now.wind_speed_kmh, " km/h"),
            now.wind_direction.map_or(ABSENT, |d| d.as_str()),
            number(now.precipitation_mm, " mm"),
            percent(now.precipitation_probability),
        );
    }

    out.push_str("\nDaily:\n");
    for day in snapshot.daily() {
        let _ = writeln!(
            out,
            "  {}  {:<14} {:>9} / {:<9} {:>8} {:>5} {:>11}",
            day.date,
            day.condition.as_str(),
            number(day.temp_min, " °C"),
            number(day.temp_max, " °C"),
            number(day.precipitation_mm, " mm"),
            percent(day.precipitation_probability),
            number(day.wind_speed_kmh, " km/h"),
        );
    }

    out
}

/// One line per sensor entity
#[must_use]
pub fn render_sensors(states: &[SensorState]) -> String {
    let mut out = String::new();
    for state in states {
        let value = state
            .value
            .as_ref()
            .map_or_else(|| ABSENT.to_string(), ToString::to_string);
        let unit = state.unit.as_deref().unwrap_or("");
        let flag = if state.stale {
            " [stale]"
        } else if state.available {
            ""
        } else {
            " [unavailable]"
        };
        let _ = writeln!(out, "{:<48} {value} {unit}{flag}", state.unique_id);
    }
    out
}
