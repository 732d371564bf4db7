//! Runtime configurations: update interval and telemetry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ==============================
// Update Configuration
// ==============================

/// Default update interval in minutes
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;

/// Shortest allowed update interval in minutes
pub const MIN_INTERVAL_MINUTES: u64 = 30;

/// Longest allowed update interval in minutes
pub const MAX_INTERVAL_MINUTES: u64 = 1440;

/// Polling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Minutes between update cycles (default: 60, allowed: 30..=1440)
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

const fn default_interval_minutes() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
        }
    }
}

impl UpdateConfig {
    /// Interval clamped to the allowed range
    ///
    /// Logs a warning when the configured value had to be adjusted.
    #[must_use]
    pub fn effective_interval(&self) -> Duration {
        let minutes = self
            .interval_minutes
            .clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
        if minutes != self.interval_minutes {
            warn!(
                configured = self.interval_minutes,
                effective = minutes,
                "Update interval out of range, clamped"
            );
        }
        Duration::from_secs(minutes * 60)
    }
}

// ==============================
// Telemetry Configuration
// ==============================

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}
