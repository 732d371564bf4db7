//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the met.hu adapter, configuration loading, logging setup and
//! the polling scheduler.

pub mod adapters;
pub mod config;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, LocationConfig, TelemetryAppConfig, UpdateConfig};
pub use scheduled_tasks::{create_forecast_refresh_task, forecast_task_name};
pub use scheduler::{PollingScheduler, SchedulerConfig, SchedulerError, TaskEvent, TaskStats};
pub use telemetry::{TelemetryError, init_telemetry};
