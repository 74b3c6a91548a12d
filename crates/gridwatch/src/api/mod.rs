//! Access to the remote F1 data API.
//!
//! The classifier and the standings aggregator only need a season schedule and
//! per-session results, so they depend on the narrow [`SeasonSource`] trait.
//! [`ApiClient`] implements it over HTTP and additionally exposes every other
//! operation the API offers (laps, telemetry, race control, circuits, rosters).

mod client;
mod endpoints;

pub use client::ApiClient;
pub use endpoints::Endpoints;

use crate::error::Result;
use crate::model::{Event, ResultRow, SessionType};

/// A source of season schedules and session classifications.
///
/// Implementors provide the data the core components consume; the HTTP
/// client is the production implementation, tests use in-memory fakes.
#[async_trait::async_trait]
pub trait SeasonSource: Send + Sync {
    /// Fetch the events of a season in calendar order.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule cannot be fetched or decoded.
    async fn schedule(&self, year: i32) -> Result<Vec<Event>>;

    /// Fetch the classification of one session.
    ///
    /// # Errors
    ///
    /// Returns an error if the results cannot be fetched or decoded, including
    /// [`crate::Error::NotFound`] when the session has no published results.
    async fn session_results(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
    ) -> Result<Vec<ResultRow>>;
}
