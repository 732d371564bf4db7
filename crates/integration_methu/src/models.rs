//! met.hu autocomplete response models

use domain::LocationRef;
use serde::Deserialize;

use crate::error::MetHuError;

/// Scalar the provider sends either quoted or bare
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum FlexValue {
    Text(String),
    Number(f64),
}

impl FlexValue {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => number.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.trim().replace(',', ".").parse().ok(),
            Self::Number(number) => Some(*number),
        }
        .filter(|value: &f64| value.is_finite())
    }
}

/// One autocomplete candidate; field names vary between provider versions
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AutocompleteEntry {
    label: Option<FlexValue>,
    value: Option<FlexValue>,
    tel: Option<FlexValue>,
    kod: Option<FlexValue>,
    id: Option<FlexValue>,
    lt: Option<FlexValue>,
    lat: Option<FlexValue>,
    n: Option<FlexValue>,
    lon: Option<FlexValue>,
}

impl AutocompleteEntry {
    /// Display name of the candidate
    pub fn name(&self) -> Option<String> {
        [&self.label, &self.value, &self.tel]
            .into_iter()
            .flatten()
            .map(FlexValue::as_text)
            .find(|name| !name.is_empty())
    }

    /// Convert into a validated location
    pub fn into_location(self) -> Result<LocationRef, MetHuError> {
        let name = self
            .name()
            .ok_or_else(|| MetHuError::Resolution("candidate has no name".to_string()))?;
        let code = self
            .kod
            .as_ref()
            .or(self.id.as_ref())
            .map(FlexValue::as_text)
            .ok_or_else(|| MetHuError::Resolution(format!("candidate '{name}' has no code")))?;
        let latitude = self
            .lt
            .as_ref()
            .or(self.lat.as_ref())
            .and_then(FlexValue::as_number)
            .ok_or_else(|| MetHuError::Resolution(format!("candidate '{name}' has no latitude")))?;
        let longitude = self
            .n
            .as_ref()
            .or(self.lon.as_ref())
            .and_then(FlexValue::as_number)
            .ok_or_else(|| MetHuError::Resolution(format!("candidate '{name}' has no longitude")))?;

        LocationRef::new(name, code, latitude, longitude)
            .map_err(|e| MetHuError::Resolution(e.to_string()))
    }
}

/// Parse the autocomplete body into candidates
///
/// Entries that are not objects are skipped; a body that is not a JSON
/// list is an error.
pub(crate) fn parse_candidates(body: &str) -> Result<Vec<AutocompleteEntry>, MetHuError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| MetHuError::Resolution(format!("invalid autocomplete response: {e}")))?;

    let serde_json::Value::Array(items) = value else {
        return Err(MetHuError::Resolution(
            "autocomplete response is not a list".to_string(),
        ));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
