//! Application configuration
//!
//! Split into focused sub-modules:
//! - `location`: settlement name and manual location override
//! - `runtime`: update interval and telemetry settings
//!
//! The provider section reuses `integration_methu::MetHuConfig` as is.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml` (or an explicit file), then `METHU_*` environment
//! variables with `__` between nested keys (e.g. `METHU_UPDATE__INTERVAL_MINUTES`).

mod location;
mod runtime;

use std::path::Path;

use chrono_tz::Tz;
use config::ConfigError;
use integration_methu::MetHuConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use location::LocationConfig;
pub use runtime::{
    DEFAULT_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES, TelemetryAppConfig,
    UpdateConfig,
};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "METHU";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location to forecast
    #[serde(default)]
    pub location: LocationConfig,

    /// met.hu endpoints and request settings
    #[serde(default)]
    pub provider: MetHuConfig,

    /// Polling settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load and validate configuration from an explicit file, or
    /// `config.toml` when `None`
    ///
    /// An explicit file must exist; the default one is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result is invalid.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::read_from(path)?;
        config.validate()?;
        debug!(settlement = %config.location.settlement, "Configuration loaded");
        Ok(config)
    }

    /// Read configuration sources without validating the result
    ///
    /// For callers that layer further overrides (e.g. command-line flags)
    /// before calling [`AppConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn read_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., METHU_LOCATION__SETTLEMENT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate the configuration
    ///
    /// The update interval is not checked here; out-of-range values are
    /// clamped by [`UpdateConfig::effective_interval`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.location.validate()?;

        for (key, url) in [
            ("provider.autocomplete_url", &self.provider.autocomplete_url),
            ("provider.forecast_url", &self.provider.forecast_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Message(format!(
                    "{key} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        if self.provider.timeout_secs == 0 || self.provider.lookup_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "provider timeouts must be greater than zero".to_string(),
            ));
        }

        self.provider.timezone.parse::<Tz>().map_err(|e| {
            ConfigError::Message(format!(
                "provider.timezone '{}' is not a known time zone: {e}",
                self.provider.timezone
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.location.settlement = "Budapest".to_string();
        config
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.provider.timezone, "Europe/Budapest");
        assert_eq!(config.update.interval_minutes, DEFAULT_INTERVAL_MINUTES);
        assert_eq!(config.telemetry.log_filter, "info");
        assert!(!config.telemetry.json);
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
            [location]
            settlement = "Debrecen"

            [location.manual]
            code = "18522"
            latitude = 47.53
            longitude = 21.63

            [provider]
            timeout_secs = 10
            client_identifier = "home"

            [update]
            interval_minutes = 45

            [telemetry]
            json = true
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.location.settlement, "Debrecen");
        let manual = config.location.manual.as_ref().unwrap();
        assert_eq!(manual.code, "18522");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.provider.lookup_timeout_secs, 15);
        assert_eq!(config.provider.client_identifier.as_deref(), Some("home"));
        assert_eq!(config.update.interval_minutes, 45);
        assert!(config.telemetry.json);
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn read_from_skips_validation() {
        let file = write_config("[update]\ninterval_minutes = 60\n");
        let config = AppConfig::read_from(Some(file.path())).unwrap();
        assert!(config.location.settlement.is_empty());
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_file_must_exist() {
        let missing = Path::new("/nonexistent/methu.toml");
        assert!(AppConfig::load_from(Some(missing)).is_err());
    }

    #[test]
    fn missing_settlement_is_rejected() {
        let file = write_config("[update]\ninterval_minutes = 60\n");
        let err = AppConfig::load_from(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("location.settlement"));
    }

    #[test]
    fn invalid_timezone_is_rejected() {
        let mut config = valid();
        config.provider.timezone = "Mars/Olympus".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("provider.timezone"));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let mut config = valid();
        config.provider.forecast_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = valid();
        config.provider.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }
}
