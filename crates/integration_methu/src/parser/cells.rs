//! Per-field cell parsers
//!
//! Each parser returns `None` for a cell it cannot read; a bad cell never
//! affects other fields of the same period.

use domain::{Percentage, WindDirection};
use regex::Regex;
use std::sync::LazyLock;

use super::grid::Cell;
use crate::aggregator::round_tenth;
use crate::condition::{ConditionMatch, map_condition, map_icon_code};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"-?\d+(?:\.\d+)?").expect("number regex")
});

const MS_TO_KMH: f64 = 3.6;

/// A number found in a cell, with whether a `%` sign follows it
#[derive(Debug, Clone, Copy, PartialEq)]
struct Reading {
    value: f64,
    percent: bool,
}

/// Normalise decimal commas and the various minus signs the provider uses
fn normalise(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ',' => '.',
            '\u{2212}' | '\u{2013}' | '\u{2014}' => '-',
            _ => c,
        })
        .collect()
}

fn readings(text: &str) -> Vec<Reading> {
    let text = normalise(text);
    NUMBER
        .find_iter(&text)
        .filter_map(|m| {
            let value: f64 = m.as_str().parse().ok()?;
            let percent = text[m.end()..].trim_start().starts_with('%');
            value.is_finite().then_some(Reading { value, percent })
        })
        .collect()
}

/// Temperature in °C: the first number of the cell
pub(crate) fn temperature(cell: &Cell) -> Option<f64> {
    readings(&cell.text).first().map(|r| r.value)
}

/// Precipitation amount and, when the cell carries one, its probability
///
/// A number followed by `%` is the probability; the first other number is
/// the amount. Dash and blank placeholders yield no amount, an explicit
/// `0` yields zero.
pub(crate) fn precipitation(cell: &Cell) -> (Option<f64>, Option<Percentage>) {
    let found = readings(&cell.text);
    let amount = found
        .iter()
        .find(|r| !r.percent)
        .map(|r| r.value.abs());
    let probability = found
        .iter()
        .find(|r| r.percent)
        .and_then(|r| Percentage::from_reading(r.value));
    (amount, probability)
}

/// Percentage for probability and humidity rows
///
/// Prefers a number marked with `%`; out-of-range values yield `None`.
pub(crate) fn percentage(cell: &Cell) -> Option<Percentage> {
    let found = readings(&cell.text);
    let reading = found.iter().find(|r| r.percent).or_else(|| found.first())?;
    Percentage::from_reading(reading.value)
}

/// Wind speed in km/h, converting from m/s when the cell or its row says so
pub(crate) fn wind_speed(cell: &Cell, row_in_ms: bool) -> Option<f64> {
    let value = readings(&cell.text).first()?.value;
    if value < 0.0 {
        return None;
    }
    let in_ms = row_in_ms || cell.text.to_lowercase().contains("m/s");
    Some(if in_ms {
        round_tenth(value * MS_TO_KMH)
    } else {
        value
    })
}

/// Wind direction from an arrow image's alt text or the cell text
pub(crate) fn wind_direction(cell: &Cell) -> Option<WindDirection> {
    let image_alt = cell.image.as_ref().map(|img| img.alt.as_str());
    image_alt
        .into_iter()
        .chain(std::iter::once(cell.text.as_str()))
        .find_map(direction_in)
}

fn direction_in(text: &str) -> Option<WindDirection> {
    WindDirection::from_abbreviation(text).or_else(|| {
        text.split(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '(' | ')'))
            .find_map(WindDirection::from_abbreviation)
    })
}

/// Condition of a period: icon code first, then alt text, then cell text
///
/// A recognised icon keeps the provider's alt text as description when
/// there is one.
pub(crate) fn condition(cell: &Cell) -> ConditionMatch {
    if let Some(image) = &cell.image {
        if let Some(mut found) = map_icon_code(&image.src) {
            if !image.alt.is_empty() {
                found.description.clone_from(&image.alt);
            }
            return found;
        }
        if !image.alt.is_empty() {
            return map_condition(&image.alt);
        }
    }
    map_condition(&cell.text)
}

/// Whether the cell text reads as a wind direction
pub(crate) fn looks_like_direction(cell: &Cell) -> bool {
    wind_direction(cell).is_some() && readings(&cell.text).is_empty()
}
