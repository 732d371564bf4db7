//! Application layer - Use cases and orchestration
//!
//! Contains the forecast service, the host-facing entity view and the
//! port definitions. Orchestrates domain objects and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod sensors;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use sensors::{
    CurrentConditions, ForecastEntry, SensorKind, SensorState, SensorValue, WeatherEntityState,
};
pub use services::*;
