//! Location section

use application::ManualLocation;
use config::ConfigError;
use domain::LocationRef;
use serde::{Deserialize, Serialize};

/// Location to forecast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Settlement name as known to met.hu
    #[serde(default)]
    pub settlement: String,

    /// Provider location entered by hand; skips the lookup when set
    #[serde(default)]
    pub manual: Option<ManualLocation>,
}

impl LocationConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.settlement.trim().is_empty() {
            return Err(ConfigError::Message(
                "location.settlement is required".to_string(),
            ));
        }

        if let Some(manual) = &self.manual {
            LocationRef::new(
                &self.settlement,
                &manual.code,
                manual.latitude,
                manual.longitude,
            )
            .map_err(|e| ConfigError::Message(format!("location.manual: {e}")))?;
        }

        Ok(())
    }
}
