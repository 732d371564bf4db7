//! met.hu forecast CLI
//!
//! Stand-in for a home-automation host: resolves settlements, runs update
//! cycles and prints the entity view the host would display.

pub mod cli;
pub mod output;

pub use cli::{Cli, Commands, LocationArgs, log_filter_from_verbosity};
