//! Date and period-label header parsing

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use regex::Regex;
use std::sync::LazyLock;

const MONTHS: [&str; 12] = [
    "január",
    "február",
    "március",
    "április",
    "május",
    "június",
    "július",
    "augusztus",
    "szeptember",
    "október",
    "november",
    "december",
];

const WEEKDAYS: [(&str, Weekday); 14] = [
    ("hétfő", Weekday::Mon),
    ("kedd", Weekday::Tue),
    ("szerda", Weekday::Wed),
    ("csütörtök", Weekday::Thu),
    ("péntek", Weekday::Fri),
    ("szombat", Weekday::Sat),
    ("vasárnap", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

const PERIOD_WORDS: [(&str, u32); 15] = [
    ("éjjel", 0),
    ("éjfél", 0),
    ("hajnal", 3),
    ("reggel", 6),
    ("délelőtt", 9),
    ("délben", 12),
    ("dél", 12),
    ("délután", 15),
    ("este", 18),
    ("éjszaka", 21),
    ("night", 0),
    ("morning", 6),
    ("noon", 12),
    ("afternoon", 12),
    ("evening", 18),
];

/// Weekday abbreviations used in front of a day number (`Sze 25`)
const WEEKDAY_ABBREVIATIONS: [&str; 20] = [
    "hé", "hét", "ke", "ked", "sze", "cs", "csü", "csüt", "pé", "pén", "szo", "va", "vas", "mon",
    "tue", "wed", "thu", "fri", "sat", "sun",
];

/// Words allowed next to an hour number
const HOUR_SUFFIXES: [&str; 5] = ["h", "ó", "óra", "kor", "utc"];

/// Year-less dates further than this from the fetch date belong to the
/// neighbouring year
const YEAR_WINDOW_DAYS: i64 = 180;

static MONTH_NAME_DATE: LazyLock<Regex> = LazyLock::new(|| {
    let months = MONTHS.join("|");
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(&format!(r"(?:(\d{{4}})\.?\s*)?({months})\s*(\d{{1,2}})")).expect("month date regex")
});

static FULL_NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"(\d{4})\s*[./-]\s*(\d{1,2})\s*[./-]\s*(\d{1,2})").expect("numeric date regex")
});

static SHORT_NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"(?:^|[^\d.])(\d{1,2})\s*[./]\s*(\d{1,2})\s*\.").expect("short date regex")
});

static WEEKDAY_DAY: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"^(\p{Alphabetic}+)\.?,?\s*(\d{1,2})\.?$").expect("weekday day regex")
});

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"\d[.,]\d").expect("decimal regex")
});

static HOUR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"^(\d{1,2})(?::00)?(?:h|ó|óra)?$").expect("hour regex")
});

/// Starting hour of a period label (`06`, `12:00`, `6h`, `reggel`, ...)
///
/// Tokens are matched whole, so `délután` is never read as `dél`. A token
/// ending in a dot is a day of month, not an hour. A number next to any
/// other word (`Sze 12`) or written with decimals (`0,2`) is not a label.
pub(crate) fn period_hour(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    if DECIMAL.is_match(&lowered) {
        return None;
    }
    let tokens: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '–' | '/' | '(' | ')'))
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.iter().any(|token| is_foreign_word(token)) {
        return None;
    }
    tokens.into_iter().find_map(token_hour)
}

fn is_foreign_word(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token_hour(token).is_none()
        && !HOUR_SUFFIXES.contains(&token)
}

fn token_hour(token: &str) -> Option<u32> {
    if let Some((_, hour)) = PERIOD_WORDS.iter().find(|(word, _)| *word == token) {
        return Some(*hour);
    }
    let captures = HOUR_TOKEN.captures(token)?;
    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    (hour <= 23).then_some(hour)
}

/// Calendar date named by a header cell
///
/// Absolute dates with or without a year, relative words (`ma`, `holnap`,
/// `today`, `tomorrow`) and weekday names are resolved against `today`.
pub(crate) fn parse_date_header(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lowered = text.to_lowercase();

    if let Some(captures) = MONTH_NAME_DATE.captures(&lowered) {
        let month_name = captures.get(2)?.as_str();
        let month = MONTHS.iter().position(|m| *m == month_name)?;
        let day: u32 = captures.get(3)?.as_str().parse().ok()?;
        let month = u32::try_from(month + 1).ok()?;
        return match captures.get(1) {
            Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day),
            None => infer_year(today, month, day),
        };
    }

    if let Some(captures) = FULL_NUMERIC_DATE.captures(&lowered) {
        return NaiveDate::from_ymd_opt(
            captures.get(1)?.as_str().parse().ok()?,
            captures.get(2)?.as_str().parse().ok()?,
            captures.get(3)?.as_str().parse().ok()?,
        );
    }

    if let Some(captures) = SHORT_NUMERIC_DATE.captures(&lowered) {
        let month: u32 = captures.get(1)?.as_str().parse().ok()?;
        let day: u32 = captures.get(2)?.as_str().parse().ok()?;
        return infer_year(today, month, day);
    }

    if let Some(captures) = WEEKDAY_DAY.captures(lowered.trim()) {
        let word = captures.get(1)?.as_str();
        if is_weekday(word) {
            let day: u32 = captures.get(2)?.as_str().parse().ok()?;
            return nearest_day_of_month(today, day);
        }
    }

    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    for word in &words {
        let offset = match *word {
            "ma" | "today" => 0,
            "holnap" | "tomorrow" => 1,
            "holnapután" => 2,
            _ => continue,
        };
        return today.checked_add_signed(Duration::days(offset));
    }

    words.iter().find_map(|word| {
        let (_, weekday) = WEEKDAYS.iter().find(|(name, _)| name == word)?;
        let ahead = (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
        today.checked_add_signed(Duration::days(i64::from(ahead)))
    })
}

fn is_weekday(word: &str) -> bool {
    WEEKDAY_ABBREVIATIONS.contains(&word) || WEEKDAYS.iter().any(|(name, _)| *name == word)
}

/// Date with the given day of month closest to `today`, earlier on ties
fn nearest_day_of_month(today: NaiveDate, day: u32) -> Option<NaiveDate> {
    let first = today.with_day(1)?;
    [
        first.checked_sub_months(Months::new(1)),
        Some(first),
        first.checked_add_months(Months::new(1)),
    ]
    .into_iter()
    .flatten()
    .filter_map(|month| month.with_day(day))
    .min_by_key(|candidate| ((*candidate - today).num_days().abs(), *candidate))
}

fn infer_year(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    let distance = (candidate - today).num_days();
    if distance < -YEAR_WINDOW_DAYS {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else if distance > YEAR_WINDOW_DAYS {
        NaiveDate::from_ymd_opt(today.year() - 1, month, day)
    } else {
        Some(candidate)
    }
}
