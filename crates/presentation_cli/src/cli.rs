//! Command-line definition

use std::path::PathBuf;

use application::ManualLocation;
use clap::{Args, Parser, Subcommand};
use infrastructure::AppConfig;

/// met.hu settlement forecast CLI
#[derive(Debug, Parser)]
#[command(name = "methu-cli")]
#[command(author, version, about = "HungaroMet settlement forecast CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "METHU_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a settlement name to its met.hu code and coordinates
    Resolve {
        /// Settlement name, e.g. "Budapest"
        name: String,
    },

    /// Run one update cycle and print the forecast
    Forecast {
        #[command(flatten)]
        location: LocationArgs,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one update cycle and print the sensor entities
    Sensors {
        #[command(flatten)]
        location: LocationArgs,

        /// Print the sensor states as JSON
        #[arg(long)]
        json: bool,
    },

    /// Poll at the configured interval until interrupted
    Watch {
        #[command(flatten)]
        location: LocationArgs,
    },
}

/// Location overrides shared by the forecast commands
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Settlement name (overrides the configuration)
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// met.hu settlement code, skips the lookup
    #[arg(long, requires_all = ["lat", "lon"])]
    pub code: Option<String>,

    /// Latitude for a manual location
    #[arg(long, requires = "code", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude for a manual location
    #[arg(long, requires = "code", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    /// Layer the overrides onto a loaded configuration
    ///
    /// A new settlement name drops a configured manual location, since the
    /// code belonged to the old name.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(settlement) = &self.settlement {
            if *settlement != config.location.settlement {
                config.location.manual = None;
            }
            config.location.settlement.clone_from(settlement);
        }

        if let (Some(code), Some(latitude), Some(longitude)) = (&self.code, self.lat, self.lon) {
            config.location.manual = Some(ManualLocation {
                code: code.clone(),
                latitude,
                longitude,
            });
        }
    }
}

/// Determine log filter level from verbosity count
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
