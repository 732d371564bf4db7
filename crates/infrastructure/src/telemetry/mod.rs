//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` (honouring
//! `RUST_LOG`) and a human-readable or JSON `fmt` layer.

mod subscriber;

pub use subscriber::{TelemetryError, build_filter, init_telemetry};
