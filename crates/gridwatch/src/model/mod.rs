//! Data model for the F1 data API.
//!
//! Every payload the API returns has a serde type here. Field names follow
//! the wire format so responses deserialize without renaming.

pub mod event;
pub mod session;
pub mod timing;
pub mod track;

pub use event::{Event, Schedule, ScheduledSession};
pub use session::{
    parse_points, DriverEntry, ResultRow, Roster, SessionDrivers, SessionResults, SessionType,
};
pub use timing::{
    display_timing, format_lap_time, parse_timing, Lap, LapData, Telemetry, TelemetrySample,
};
pub use track::{CircuitDetails, Corner, EventInfo, Health, RaceControlLog, RaceControlMessage};
