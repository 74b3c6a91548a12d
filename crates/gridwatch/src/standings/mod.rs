//! Championship standings aggregated from per-event results.
//!
//! The API publishes classifications per session but no running totals, so
//! standings are rebuilt by walking every completed round of a season:
//!
//! 1. pick the eligible events (race already started, round known, session
//!    actually run that weekend)
//! 2. fetch each round's classification, one at a time, with a timeout
//! 3. sum points per driver and per team, skipping rounds that fail
//! 4. rank both tables by points
//!
//! Progress can be observed through an `mpsc` channel of
//! [`StandingsSnapshot`]s, and a run can be abandoned with a [`CancelToken`].

mod aggregator;
mod cancel;
mod table;

pub use aggregator::{eligible_events, Aggregator, DEFAULT_FETCH_TIMEOUT};
pub use cancel::{CancelToken, StandingsSupervisor};
pub use table::{ConstructorStanding, DriverStanding, StandingsRun};

use serde::Serialize;

use crate::model::SessionType;

/// How a finished aggregation went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every eligible round was processed.
    Complete,
    /// Some rounds were skipped after failed fetches.
    Partial {
        /// Rounds whose results could not be fetched.
        skipped_rounds: Vec<u32>,
    },
    /// No event of the season has started yet.
    NoEligibleEvents,
    /// Events have run, but no classification could be fetched.
    NoResultsAvailable {
        /// Rounds whose results could not be fetched.
        skipped_rounds: Vec<u32>,
    },
}

impl Outcome {
    /// Whether the standings hold at least one processed round.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Complete | Self::Partial { .. })
    }

    /// Short machine-friendly name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial { .. } => "partial",
            Self::NoEligibleEvents => "no_eligible_events",
            Self::NoResultsAvailable { .. } => "no_results_available",
        }
    }

    /// Message shown to the user for empty or partial standings.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Complete => None,
            Self::Partial { skipped_rounds } => Some(format!(
                "results unavailable for round(s) {}; totals may be incomplete",
                join_rounds(skipped_rounds)
            )),
            Self::NoEligibleEvents => Some("no races yet this season".to_string()),
            Self::NoResultsAvailable { .. } => {
                Some("results not posted for any completed race".to_string())
            }
        }
    }
}

fn join_rounds(rounds: &[u32]) -> String {
    rounds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Final standings of one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    /// Season aggregated.
    pub year: i32,
    /// Session whose points were summed.
    pub session: SessionType,
    /// Drivers ranked by points.
    pub drivers: Vec<DriverStanding>,
    /// Teams ranked by points.
    pub constructors: Vec<ConstructorStanding>,
    /// Number of events that qualified for aggregation.
    pub eligible_events: usize,
    /// Rounds whose results were counted, in processing order.
    pub processed_rounds: Vec<u32>,
    /// How the run went.
    pub outcome: Outcome,
}

/// Intermediate standings published after each processed round.
#[derive(Debug, Clone, Serialize)]
pub struct StandingsSnapshot {
    /// Round just processed.
    pub round: u32,
    /// Name of that round's event.
    pub event_name: String,
    /// Rounds processed so far.
    pub processed: usize,
    /// Total eligible rounds in this run.
    pub eligible: usize,
    /// Driver standings so far.
    pub drivers: Vec<DriverStanding>,
    /// Constructor standings so far.
    pub constructors: Vec<ConstructorStanding>,
}
