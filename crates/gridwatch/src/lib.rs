//! `gridwatch` - A Formula 1 season dashboard backed by an F1 data API
//!
//! This library provides the event time classifier behind race countdowns,
//! the standings aggregator that rebuilds championship tables from per-round
//! results, and a typed client for the rest of the API.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod standings;

pub use api::{ApiClient, SeasonSource};
pub use classify::{Bucket, Classification, ClassifiedEvent, DashboardView};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Event, ResultRow, SessionType};
pub use standings::{Aggregator, CancelToken, Outcome, Standings, StandingsSupervisor};
