//! Mapping of met.hu icon codes and condition text to [`ConditionCode`]
//!
//! The provider marks each period with an icon file (`04.gif`, `n02.png`)
//! and an `alt` text in Hungarian. Icon codes are looked up in a fixed
//! table; free text goes through an ordered keyword table. Anything else
//! maps to [`ConditionCode::Unknown`] so the mapping never fails.

use domain::ConditionCode;
use regex::Regex;
use std::sync::LazyLock;

/// Outcome of mapping a provider token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionMatch {
    /// Standard condition
    pub code: ConditionCode,
    /// Human-readable description
    pub description: String,
}

impl ConditionMatch {
    fn new(code: ConditionCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// Whether the token was recognised
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.code != ConditionCode::Unknown
    }
}

static ICON_CODE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"(?i)(?:^|/)(n?)(\d{2})(?:\.(?:gif|png|jpe?g|svg))?$").expect("icon code regex")
});

/// Day icons `01`-`14`
const ICON_TABLE: [(ConditionCode, &str); 14] = [
    (ConditionCode::Clear, "derült"),
    (ConditionCode::PartlyCloudy, "kissé felhős"),
    (ConditionCode::PartlyCloudy, "közepesen felhős"),
    (ConditionCode::Cloudy, "erősen felhős"),
    (ConditionCode::Cloudy, "borult"),
    (ConditionCode::Rain, "gyenge eső"),
    (ConditionCode::Rain, "eső"),
    (ConditionCode::Pouring, "erős eső"),
    (ConditionCode::Thunderstorm, "zivatar"),
    (ConditionCode::Snow, "havazás"),
    (ConditionCode::Sleet, "havas eső"),
    (ConditionCode::Fog, "köd"),
    (ConditionCode::Windy, "szeles idő"),
    (ConditionCode::Hail, "jégeső"),
];

/// Ordered keyword table for free text; earlier entries win, so compound
/// phrases precede the words they contain
const KEYWORDS: &[(&[&str], ConditionCode)] = &[
    (&["zivatar", "thunder", "villám"], ConditionCode::Thunderstorm),
    (&["jégeső", "hail"], ConditionCode::Hail),
    (&["havas eső", "ónos", "sleet"], ConditionCode::Sleet),
    (&["hó", "havaz", "snow"], ConditionCode::Snow),
    (&["felhőszakadás", "erős eső", "heavy rain", "pouring"], ConditionCode::Pouring),
    (
        &["eső", "esik", "zápor", "szitál", "rain", "shower", "drizzle", "csapadék"],
        ConditionCode::Rain,
    ),
    (&["köd", "pára", "fog", "mist"], ConditionCode::Fog),
    (&["szeles", "viharos", "wind"], ConditionCode::Windy),
    (&["derült", "napos", "clear", "sunny"], ConditionCode::Clear),
    (
        &["részben felhős", "kissé felhős", "közepesen felhős", "gyengén felhős", "változékony", "partly"],
        ConditionCode::PartlyCloudy,
    ),
    (&["felhős", "borult", "cloud", "overcast"], ConditionCode::Cloudy),
];

/// Map a provider icon code or condition text to a standard condition
///
/// Never fails: empty input yields `Unknown` with an empty description,
/// unrecognised input yields `Unknown` with the trimmed token.
///
/// # Examples
///
/// ```
/// use domain::ConditionCode;
/// use integration_methu::map_condition;
///
/// assert_eq!(map_condition("n01").code, ConditionCode::ClearNight);
/// assert_eq!(map_condition("Zivatar várható").code, ConditionCode::Thunderstorm);
/// assert_eq!(map_condition("???").description, "???");
/// ```
#[must_use]
pub fn map_condition(token: &str) -> ConditionMatch {
    let token = token.trim();
    if token.is_empty() {
        return ConditionMatch::new(ConditionCode::Unknown, "");
    }

    if let Some(found) = map_icon_code(token) {
        return found;
    }

    let lowered = token.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|word| lowered.contains(word)))
        .map_or_else(
            || ConditionMatch::new(ConditionCode::Unknown, token),
            |(_, code)| ConditionMatch::new(*code, token),
        )
}

/// Look up an icon code or icon file path (`04`, `n02.gif`, `/img/w/12.png`)
pub(crate) fn map_icon_code(token: &str) -> Option<ConditionMatch> {
    let captures = ICON_CODE.captures(token.trim())?;
    let night = !captures.get(1)?.as_str().is_empty();
    let number: usize = captures.get(2)?.as_str().parse().ok()?;
    let (code, description) = *ICON_TABLE.get(number.checked_sub(1)?)?;

    if night && code == ConditionCode::Clear {
        return Some(ConditionMatch::new(ConditionCode::ClearNight, "derült éjszaka"));
    }
    Some(ConditionMatch::new(code, description))
}
