//! Forecast table parser
//!
//! The forecast fragment holds a table with one column per 6-hour period:
//! a date header row (usually `colspan`ned over the day's periods), a
//! period-label row, and one row per field with the field name in the
//! first cell. The parser locates that structure by its headers instead of
//! fixed positions and also accepts the transposed layout, one row per
//! period. Tables with labelled data rows but no period-label row are read
//! column by column as consecutive 6-hour periods.

mod cells;
mod grid;
mod headers;
mod rows;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;
use domain::HourlyRecord;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, trace};

use self::grid::{Cell, Grid, collapse_whitespace};
use self::headers::{parse_date_header, period_hour};
use self::rows::{RowKind, classify_content, classify_label};
use crate::error::MetHuError;

/// Units that mark a cell as data
const UNITS: [&str; 5] = ["°", "%", "mm", "km/h", "m/s"];

/// Period labels of a time row all fall on this grid
const PERIOD_GRID_HOURS: u32 = 3;

/// Period length assumed when the table carries no period labels
const FALLBACK_PERIOD_HOURS: u32 = 6;

static TABLE: LazyLock<Selector> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static selector
    Selector::parse("table").expect("table selector")
});

/// Parse the forecast fragment into a time-ordered sequence of periods
///
/// `fetched_at` resolves relative and year-less date headers and supplies
/// the time zone of the table. Fields that cannot be read are left empty;
/// periods without any field are dropped. The result may be empty when the
/// table is present but holds no data.
///
/// # Errors
///
/// Returns `MetHuError::ParseStructure` when the response is a placeholder,
/// or when no table has period labels with data rows and none has labelled
/// numeric rows to read column by column.
pub fn parse_forecast(html: &str, fetched_at: DateTime<Tz>) -> Result<Vec<HourlyRecord>, MetHuError> {
    let document = Html::parse_document(html);

    let page_text = collapse_whitespace(&document.root_element().text().collect::<String>());
    if page_text.is_empty() || matches!(page_text.to_lowercase().as_str(), "idojaras" | "időjárás") {
        return Err(MetHuError::ParseStructure(
            "empty or placeholder response".to_string(),
        ));
    }

    let today = fetched_at.date_naive();
    let zone = fetched_at.timezone();
    let mut by_columns: Option<(usize, Grid, Layout)> = None;

    for (index, table) in document.select(&TABLE).enumerate() {
        let grid = Grid::from_table(table);
        for candidate in [grid.clone(), grid.transposed()] {
            if let Some(layout) = Layout::detect(&candidate, today) {
                let records = layout.records(&candidate, &zone);
                debug!(
                    table = index,
                    periods = records.len(),
                    fields = layout.rows.len(),
                    "Parsed forecast table"
                );
                return Ok(records);
            }
        }
        if by_columns.is_none() {
            by_columns = Layout::by_columns(&grid, fetched_at.naive_local())
                .map(|layout| (index, grid, layout));
        }
        trace!(table = index, "Table has no period-label row");
    }

    if let Some((index, grid, layout)) = by_columns {
        let records = layout.records(&grid, &zone);
        debug!(
            table = index,
            periods = records.len(),
            fields = layout.rows.len(),
            "Parsed forecast table by columns"
        );
        return Ok(records);
    }

    Err(MetHuError::ParseStructure(
        "no table with period labels or labelled data rows".to_string(),
    ))
}

/// One period column: grid column, date and starting hour
#[derive(Debug, Clone, Copy)]
struct Period {
    column: usize,
    date: NaiveDate,
    hour: u32,
}

/// Recognised structure of a grid
#[derive(Debug)]
struct Layout {
    periods: Vec<Period>,
    rows: HashMap<RowKind, usize>,
    wind_in_ms: bool,
}

impl Layout {
    fn detect(grid: &Grid, today: NaiveDate) -> Option<Self> {
        let time_row = find_time_row(grid, today)?;
        let columns: Vec<usize> = grid.rows()[time_row]
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.origin && period_label(cell).is_some())
            .map(|(c, _)| c)
            .collect();

        let date_row = find_date_row(grid, time_row, today);
        let label_column = (0..grid.width()).find(|c| !columns.contains(c));

        let mut rows = HashMap::new();
        let mut wind_in_ms = false;
        for (r, row) in grid.rows().iter().enumerate() {
            if r == time_row || Some(r) == date_row {
                continue;
            }
            let label = label_column
                .and_then(|c| row.get(c))
                .map(|cell| cell.text.as_str())
                .unwrap_or_default();
            let data: Vec<&Cell> = columns.iter().filter_map(|&c| row.get(c)).collect();
            if spans_whole_row(&data) {
                continue;
            }

            let kind = if label.is_empty() {
                classify_content(&data)
            } else {
                classify_label(label)
            };
            if let Some(kind) = kind {
                claim_row(&mut rows, &mut wind_in_ms, kind, label, r);
            }
        }

        if rows.is_empty() {
            return None;
        }

        let periods = build_axis(grid, time_row, date_row, &columns, today);
        Some(Self {
            periods,
            rows,
            wind_in_ms,
        })
    }

    /// Labelled data rows without a period-label row
    ///
    /// Column 0 holds the labels and every further column is the next
    /// 6-hour period, starting at midnight of the first dated header or at
    /// the period holding `now`. At least one numeric field row is required.
    fn by_columns(grid: &Grid, now: NaiveDateTime) -> Option<Self> {
        let today = now.date();
        let mut rows = HashMap::new();
        let mut wind_in_ms = false;
        for (r, row) in grid.rows().iter().enumerate() {
            let Some(label) = row.first().filter(|cell| cell.origin) else {
                continue;
            };
            if let Some(kind) = classify_label(&label.text) {
                claim_row(&mut rows, &mut wind_in_ms, kind, &label.text, r);
            }
        }

        let numeric = [RowKind::Temperature, RowKind::Precipitation, RowKind::WindSpeed];
        if !numeric.iter().any(|kind| rows.contains_key(kind)) {
            return None;
        }

        let start = grid
            .rows()
            .iter()
            .enumerate()
            .filter(|(r, _)| !rows.values().any(|data_row| data_row == r))
            .flat_map(|(_, row)| row.iter().skip(1))
            .filter(|cell| cell.origin)
            .find_map(|cell| parse_date_header(&cell.text, today))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .or_else(|| {
                let hour = now.hour() / FALLBACK_PERIOD_HOURS * FALLBACK_PERIOD_HOURS;
                today.and_hms_opt(hour, 0, 0)
            })?;

        let periods = (1..grid.width())
            .zip(0_i64..)
            .map(|(column, slot)| {
                let at = start + Duration::hours(slot * i64::from(FALLBACK_PERIOD_HOURS));
                Period {
                    column,
                    date: at.date(),
                    hour: at.hour(),
                }
            })
            .collect();

        Some(Self {
            periods,
            rows,
            wind_in_ms,
        })
    }

    fn records(&self, grid: &Grid, zone: &Tz) -> Vec<HourlyRecord> {
        let mut records: Vec<HourlyRecord> = Vec::with_capacity(self.periods.len());

        for period in &self.periods {
            let Some(timestamp) = local_timestamp(zone, period.date, period.hour) else {
                debug!(date = %period.date, hour = period.hour, "Skipping unrepresentable period");
                continue;
            };
            if records.last().is_some_and(|last| last.timestamp >= timestamp) {
                debug!(%timestamp, "Skipping period that does not advance the time axis");
                continue;
            }

            let record = self.record_at(grid, period.column, timestamp);
            if record.has_data() {
                records.push(record);
            } else {
                trace!(%timestamp, "Dropping period without data");
            }
        }

        records
    }

    fn record_at(&self, grid: &Grid, column: usize, timestamp: DateTime<FixedOffset>) -> HourlyRecord {
        let mut record = HourlyRecord::empty(timestamp);
        let cell_of = |kind: RowKind| {
            self.rows
                .get(&kind)
                .and_then(|&row| grid.cell(row, column))
        };

        if let Some(cell) = cell_of(RowKind::Condition) {
            let condition = cells::condition(cell);
            record.condition = condition.code;
            record.description = condition.description;
        }
        if let Some(cell) = cell_of(RowKind::Temperature) {
            record.temperature = cells::temperature(cell);
        }
        if let Some(cell) = cell_of(RowKind::Precipitation) {
            let (amount, probability) = cells::precipitation(cell);
            record.precipitation_mm = amount;
            record.precipitation_probability = probability;
        }
        if let Some(cell) = cell_of(RowKind::Probability) {
            record.precipitation_probability =
                cells::percentage(cell).or(record.precipitation_probability);
        }
        if let Some(cell) = cell_of(RowKind::WindSpeed) {
            record.wind_speed_kmh = cells::wind_speed(cell, self.wind_in_ms);
        }
        if let Some(cell) = cell_of(RowKind::WindDirection) {
            record.wind_direction = cells::wind_direction(cell);
        }
        if let Some(cell) = cell_of(RowKind::Humidity) {
            record.humidity = cells::percentage(cell);
        }

        record
    }
}

/// Record the first row found for a field
fn claim_row(
    rows: &mut HashMap<RowKind, usize>,
    wind_in_ms: &mut bool,
    kind: RowKind,
    label: &str,
    row: usize,
) {
    if rows.contains_key(&kind) {
        return;
    }
    if kind == RowKind::WindSpeed && label.to_lowercase().contains("m/s") {
        *wind_in_ms = true;
    }
    rows.insert(kind, row);
}

fn carries_unit(text: &str) -> bool {
    let text = text.to_lowercase();
    UNITS.iter().any(|unit| text.contains(unit))
}

/// Period hour of a header cell; cells carrying a unit are data, not labels
fn period_label(cell: &Cell) -> Option<u32> {
    if carries_unit(&cell.text) {
        return None;
    }
    period_hour(&cell.text)
}

/// First row that reads as the period-label axis
fn find_time_row(grid: &Grid, today: NaiveDate) -> Option<usize> {
    grid.rows().iter().position(|row| is_time_row(row, today))
}

/// At least two period labels on the 3-hour grid that outnumber the row's
/// dates; any other cell naming a field or carrying a unit makes it a data row
fn is_time_row(row: &[Cell], today: NaiveDate) -> bool {
    let mut hours = Vec::new();
    let mut dates = 0;
    for cell in row.iter().filter(|cell| cell.origin && !cell.text.is_empty()) {
        if let Some(hour) = period_label(cell) {
            hours.push(hour);
        } else if classify_label(&cell.text).is_some() || carries_unit(&cell.text) {
            return false;
        } else if parse_date_header(&cell.text, today).is_some() {
            dates += 1;
        }
    }
    hours.len() >= 2
        && hours.len() > dates
        && hours.iter().all(|hour| hour % PERIOD_GRID_HOURS == 0)
}

/// Row carrying the most date headers, preferring rows above the time row
fn find_date_row(grid: &Grid, time_row: usize, today: NaiveDate) -> Option<usize> {
    let date_count = |r: usize| {
        grid.rows()[r]
            .iter()
            .filter(|cell| cell.origin && parse_date_header(&cell.text, today).is_some())
            .count()
    };
    let best = |range: &mut dyn Iterator<Item = usize>| {
        range
            .map(|r| (r, date_count(r)))
            .filter(|&(_, count)| count > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(r, _)| r)
    };
    best(&mut (0..time_row)).or_else(|| best(&mut (time_row + 1..grid.rows().len())))
}

/// A title row whose data slots all come from one spanning cell
fn spans_whole_row(data: &[&Cell]) -> bool {
    data.len() > 1 && data.iter().all(|cell| !cell.origin)
}

/// Assign a date to every period column
///
/// When the date row covers every period column (the `colspan` case) each
/// column takes its own date. Otherwise the dated headers are consumed in
/// order, moving to the next one whenever the period hour does not
/// increase; past the last header, or without any, days are counted on
/// from the fetch date. Date cells inside the period-label row (one row
/// per period layouts) restart the count.
fn build_axis(
    grid: &Grid,
    time_row: usize,
    date_row: Option<usize>,
    columns: &[usize],
    today: NaiveDate,
) -> Vec<Period> {
    let date_at = |row: usize, col: usize| {
        grid.cell(row, col)
            .and_then(|cell| parse_date_header(&cell.text, today))
    };

    let aligned: Option<Vec<NaiveDate>> = date_row.and_then(|r| {
        columns.iter().map(|&c| date_at(r, c)).collect()
    });
    if let Some(dates) = aligned {
        return columns
            .iter()
            .zip(dates)
            .filter_map(|(&column, date)| {
                let hour = grid.cell(time_row, column).and_then(period_label)?;
                Some(Period { column, date, hour })
            })
            .collect();
    }

    let mut sequence: Vec<NaiveDate> = date_row
        .map(|r| {
            grid.rows()[r]
                .iter()
                .filter(|cell| cell.origin)
                .filter_map(|cell| parse_date_header(&cell.text, today))
                .collect()
        })
        .unwrap_or_default();
    sequence.dedup();

    let mut periods = Vec::with_capacity(columns.len());
    let mut next_header = 0;
    let mut current: Option<NaiveDate> = None;
    let mut previous_hour: Option<u32> = None;

    for column in 0..grid.width() {
        let Some(cell) = grid.cell(time_row, column) else {
            continue;
        };
        if !columns.contains(&column) {
            if let Some(marker) = cell.origin.then(|| parse_date_header(&cell.text, today)).flatten() {
                current = Some(marker);
                previous_hour = None;
            }
            continue;
        }
        let Some(hour) = period_label(cell) else {
            continue;
        };

        let date = match (current, previous_hour) {
            (Some(day), Some(prev)) if hour <= prev => {
                next_header += 1;
                sequence
                    .get(next_header)
                    .copied()
                    .unwrap_or_else(|| day + Duration::days(1))
            },
            (Some(day), _) => day,
            (None, _) => sequence.first().copied().unwrap_or(today),
        };

        current = Some(date);
        previous_hour = Some(hour);
        periods.push(Period { column, date, hour });
    }

    periods
}

/// Zone-aware start of a period; hours skipped by a DST change move forward
fn local_timestamp(zone: &Tz, date: NaiveDate, hour: u32) -> Option<DateTime<FixedOffset>> {
    let naive = date.and_hms_opt(hour, 0, 0)?;
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.fixed_offset())
}
