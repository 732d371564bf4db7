//! Classification of data rows by label keyword or content

use super::cells::looks_like_direction;
use super::grid::Cell;

/// Field carried by a data row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RowKind {
    Condition,
    Temperature,
    Precipitation,
    Probability,
    WindSpeed,
    WindDirection,
    Humidity,
}

/// Classify a row by its label cell
///
/// Order matters: probability rows mention precipitation, direction rows
/// mention wind.
pub(crate) fn classify_label(label: &str) -> Option<RowKind> {
    let label = label.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| label.contains(w));

    if label.is_empty() || has(&["lökés", "gust", "hőérzet", "feels"]) {
        None
    } else if has(&["valószín", "prob", "esély"]) {
        Some(RowKind::Probability)
    } else if has(&["csapadék", "precip"]) {
        Some(RowKind::Precipitation)
    } else if has(&["irány", "direction"]) {
        Some(RowKind::WindDirection)
    } else if has(&["szél", "wind"]) {
        Some(RowKind::WindSpeed)
    } else if has(&["hőmérséklet", "hőm.", "temp"]) {
        Some(RowKind::Temperature)
    } else if has(&["nedvesség", "páratartalom", "humid"]) {
        Some(RowKind::Humidity)
    } else if has(&["időjárás", "jelleg", "leírás", "égkép", "condition", "weather"]) {
        Some(RowKind::Condition)
    } else {
        None
    }
}

/// Classify an unlabelled row by what most of its data cells contain
pub(crate) fn classify_content(cells: &[&Cell]) -> Option<RowKind> {
    let filled: Vec<&Cell> = cells.iter().copied().filter(|c| !c.is_blank()).collect();
    if filled.is_empty() {
        return None;
    }
    let majority =
        |test: &dyn Fn(&Cell) -> bool| filled.iter().filter(|&&c| test(c)).count() * 2 > filled.len();
    let text_has = |needle: &'static str| move |c: &Cell| c.text.to_lowercase().contains(needle);

    if majority(&looks_like_direction) {
        Some(RowKind::WindDirection)
    } else if majority(&|c: &Cell| c.image.is_some()) {
        Some(RowKind::Condition)
    } else if majority(&text_has("°")) {
        Some(RowKind::Temperature)
    } else if majority(&text_has("mm")) {
        Some(RowKind::Precipitation)
    } else if majority(&|c: &Cell| {
        let text = c.text.to_lowercase();
        text.contains("km/h") || text.contains("m/s")
    }) {
        Some(RowKind::WindSpeed)
    } else if majority(&text_has("%")) {
        Some(RowKind::Probability)
    } else {
        None
    }
}
