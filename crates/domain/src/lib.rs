//! Domain layer for the met.hu forecast workspace
//!
//! Contains the forecast records, value objects and domain errors.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod errors;
pub mod forecast;
pub mod value_objects;

pub use errors::DomainError;
pub use forecast::*;
pub use value_objects::*;
