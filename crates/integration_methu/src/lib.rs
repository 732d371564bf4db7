//! HungaroMet settlement forecast integration
//!
//! Client for the met.hu settlement forecast page
//! (<https://www.met.hu/idojaras/elorejelzes/magyarorszagi_telepulesek/>).
//! The provider has no API: settlements are resolved through the site's
//! autocomplete endpoint and the forecast arrives as an HTML table, which
//! is parsed into 6-hourly records and rolled up into days.

pub mod aggregator;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
mod models;
pub mod parser;

pub use aggregator::aggregate_daily;
pub use client::{ForecastSource, MetHuClient};
pub use condition::{ConditionMatch, map_condition};
pub use config::MetHuConfig;
pub use error::MetHuError;
pub use parser::parse_forecast;
