//! Forecast records - the parsed hourly sequence, its daily roll-up and
//! the snapshot published after a successful update cycle

mod daily;
mod hourly;
mod snapshot;

pub use daily::DailyRecord;
pub use hourly::HourlyRecord;
pub use snapshot::ForecastSnapshot;
