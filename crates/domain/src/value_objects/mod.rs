//! Value Objects - Immutable, identity-less domain primitives

mod condition_code;
mod location_ref;
mod percentage;
mod wind_direction;

pub use condition_code::ConditionCode;
pub use location_ref::LocationRef;
pub use percentage::Percentage;
pub use wind_direction::WindDirection;
