//! Sequential aggregation of a season's race results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::table::StandingsRun;
use super::{Outcome, Standings, StandingsSnapshot};
use crate::api::SeasonSource;
use crate::error::{Error, Result};
use crate::model::{Event, ResultRow, SessionType};

/// Default timeout for each per-round results fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Events whose results can be counted, in ascending round order.
///
/// An event is eligible when it has a round number and a race session
/// timestamp, and its reference moment lies strictly before `now`.
#[must_use]
pub fn eligible_events(events: &[Event], now: DateTime<Utc>) -> Vec<&Event> {
    let mut eligible: Vec<&Event> = events
        .iter()
        .filter(|event| event.round_number.is_some() && event.race_time().is_some())
        .filter(|event| event.reference_time().is_some_and(|reference| reference < now))
        .collect();
    eligible.sort_by_key(|event| event.round());
    eligible
}

/// Folds per-round classifications into championship standings.
///
/// Rounds are fetched one at a time. A round whose fetch fails or times out
/// is skipped; the run carries on with the next one.
#[derive(Debug)]
pub struct Aggregator<'a, S: SeasonSource + ?Sized> {
    source: &'a S,
    session: SessionType,
    fetch_timeout: Duration,
    cancel: CancelToken,
    progress: Option<mpsc::Sender<StandingsSnapshot>>,
}

impl<'a, S: SeasonSource + ?Sized> Aggregator<'a, S> {
    /// Create an aggregator summing race points from `source`.
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            session: SessionType::Race,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    /// Sum points from a different session (e.g. sprints).
    #[must_use]
    pub fn with_session(mut self, session: SessionType) -> Self {
        self.session = session;
        self
    }

    /// Set the timeout for each round's fetch.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Stop the run when `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Send a snapshot after every successfully processed round.
    ///
    /// Sending waits for channel capacity, so the receiver must be drained
    /// concurrently or sized for the whole season.
    #[must_use]
    pub fn with_progress(mut self, tx: mpsc::Sender<StandingsSnapshot>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Fetch the season schedule and aggregate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule cannot be fetched or the run is
    /// cancelled. Failures of individual rounds are not errors.
    pub async fn aggregate_season(&self, year: i32, now: DateTime<Utc>) -> Result<Standings> {
        let events = self.source.schedule(year).await?;
        debug!(year, events = events.len(), "fetched schedule");
        self.aggregate(year, &events, now).await
    }

    /// Aggregate standings over the eligible events of `events`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the cancel token fires during the run.
    /// A cancelled run yields no standings, even when its last fetch completed.
    pub async fn aggregate(
        &self,
        year: i32,
        events: &[Event],
        now: DateTime<Utc>,
    ) -> Result<Standings> {
        // Weekends without the session (conventional rounds in a sprint
        // run) have nothing to fetch and are not counted as failures.
        let eligible: Vec<&Event> = eligible_events(events, now)
            .into_iter()
            .filter(|event| event.hosts(self.session))
            .collect();
        info!(
            year,
            session = %self.session,
            eligible = eligible.len(),
            total = events.len(),
            "aggregating standings"
        );

        let mut run = StandingsRun::new();
        let mut processed_rounds = Vec::new();
        let mut skipped_rounds = Vec::new();

        for event in &eligible {
            if self.cancel.is_cancelled() {
                info!(year, round = event.round(), "standings run cancelled");
                return Err(Error::Cancelled);
            }

            let round = event.round();
            let fetched = self.fetch_round(year, round).await;
            if self.cancel.is_cancelled() {
                info!(year, round, "standings run cancelled during fetch");
                return Err(Error::Cancelled);
            }
            match fetched {
                Ok(rows) => {
                    run.record(&rows);
                    processed_rounds.push(round);
                    info!(round, event = %event.event_name, rows = rows.len(), "processed round");
                    self.emit(&run, event, processed_rounds.len(), eligible.len())
                        .await;
                }
                Err(err) => {
                    warn!(round, event = %event.event_name, error = %err, "skipping round");
                    skipped_rounds.push(round);
                }
            }
        }

        let outcome = if eligible.is_empty() {
            Outcome::NoEligibleEvents
        } else if processed_rounds.is_empty() {
            Outcome::NoResultsAvailable { skipped_rounds }
        } else if skipped_rounds.is_empty() {
            Outcome::Complete
        } else {
            Outcome::Partial { skipped_rounds }
        };
        info!(
            year,
            processed = processed_rounds.len(),
            outcome = outcome.label(),
            "standings aggregation finished"
        );

        Ok(Standings {
            year,
            session: self.session,
            drivers: run.driver_standings(),
            constructors: run.constructor_standings(),
            eligible_events: eligible.len(),
            processed_rounds,
            outcome,
        })
    }

    async fn fetch_round(&self, year: i32, round: u32) -> Result<Vec<ResultRow>> {
        debug!(year, round, session = %self.session, "fetching results");
        match tokio::time::timeout(
            self.fetch_timeout,
            self.source.session_results(year, round, self.session),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(format!(
                "{} results for {year} round {round}",
                self.session
            ))),
        }
    }

    async fn emit(&self, run: &StandingsRun, event: &Event, processed: usize, eligible: usize) {
        let Some(tx) = &self.progress else {
            return;
        };
        let snapshot = StandingsSnapshot {
            round: event.round(),
            event_name: event.event_name.clone(),
            processed,
            eligible,
            drivers: run.driver_standings(),
            constructors: run.constructor_standings(),
        };
        if tx.send(snapshot).await.is_err() {
            debug!("progress receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn event(round: u32, days_from_now: i64) -> Event {
        Event {
            round_number: Some(round),
            event_name: format!("Round {round} Grand Prix"),
            session5: Some("Race".to_string()),
            session5_date: Some(now() + chrono::Duration::days(days_from_now)),
            ..Event::default()
        }
    }

    fn row(name: &str, team: &str, points: f64) -> ResultRow {
        ResultRow {
            full_name: name.to_string(),
            team_name: team.to_string(),
            points,
            ..ResultRow::default()
        }
    }

    /// In-memory season with per-round results and failure injection.
    #[derive(Default)]
    struct FakeSeason {
        events: Vec<Event>,
        results: HashMap<u32, Vec<ResultRow>>,
        failing: HashSet<u32>,
        hanging: HashSet<u32>,
        schedule_fails: bool,
        requested: Mutex<Vec<u32>>,
    }

    #[async_trait::async_trait]
    impl SeasonSource for FakeSeason {
        async fn schedule(&self, _year: i32) -> Result<Vec<Event>> {
            if self.schedule_fails {
                return Err(Error::api(500, "schedule unavailable"));
            }
            Ok(self.events.clone())
        }

        async fn session_results(
            &self,
            _year: i32,
            round: u32,
            _session: SessionType,
        ) -> Result<Vec<ResultRow>> {
            self.requested.lock().unwrap().push(round);
            if self.hanging.contains(&round) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if self.failing.contains(&round) {
                return Err(Error::api(500, "session not loaded"));
            }
            self.results
                .get(&round)
                .cloned()
                .ok_or_else(|| Error::not_found(format!("round {round}")))
        }
    }

    fn points_of(standings: &Standings, name: &str) -> f64 {
        standings
            .drivers
            .iter()
            .find(|d| d.name == name)
            .map_or(0.0, |d| d.points)
    }

    #[test]
    fn test_eligible_events_filters_and_sorts() {
        let mut no_race = event(4, -20);
        no_race.session5_date = None;
        no_race.session4_date = Some(now() - chrono::Duration::days(20));
        let mut no_round = event(0, -30);
        no_round.round_number = None;

        let events = vec![event(3, -5), event(1, -19), no_race, event(5, 2), no_round];
        let rounds: Vec<u32> = eligible_events(&events, now())
            .iter()
            .map(|e| e.round())
            .collect();
        assert_eq!(rounds, vec![1, 3]);
    }

    #[test]
    fn test_event_in_progress_is_not_eligible() {
        // Race starts in an hour
        let mut upcoming = event(1, 0);
        upcoming.session5_date = Some(now() + chrono::Duration::hours(1));
        assert!(eligible_events(&[upcoming], now()).is_empty());
    }

    #[tokio::test]
    async fn test_two_driver_tie_scenario() {
        let season = FakeSeason {
            events: vec![event(1, -14), event(2, -7), event(3, 7)],
            results: HashMap::from([
                (1, vec![row("Driver A", "T1", 25.0), row("Driver B", "T2", 18.0)]),
                (2, vec![row("Driver B", "T2", 25.0), row("Driver A", "T1", 18.0)]),
                (3, vec![row("Driver C", "T3", 25.0)]),
            ]),
            ..FakeSeason::default()
        };

        let standings = Aggregator::new(&season)
            .aggregate_season(2025, now())
            .await
            .unwrap();

        assert_eq!(*season.requested.lock().unwrap(), vec![1, 2]);
        assert_eq!(standings.outcome, Outcome::Complete);
        assert_eq!(standings.eligible_events, 2);
        assert_eq!(standings.processed_rounds, vec![1, 2]);

        let names: Vec<&str> = standings.drivers.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Driver A", "Driver B"]);
        assert!((standings.drivers[0].points - 43.0).abs() < f64::EPSILON);
        assert!((standings.drivers[1].points - 43.0).abs() < f64::EPSILON);

        let teams: Vec<(&str, f64)> = standings
            .constructors
            .iter()
            .map(|c| (c.name.as_str(), c.points))
            .collect();
        assert_eq!(teams, vec![("T1", 43.0), ("T2", 43.0)]);
    }

    #[tokio::test]
    async fn test_partial_failure_skips_round() {
        crate::logging::init_test_logging();

        let results: HashMap<u32, Vec<ResultRow>> = (1..=5)
            .map(|round| (round, vec![row("Driver A", "T1", f64::from(round))]))
            .collect();
        let season = FakeSeason {
            events: (1..=5).map(|round| event(round, -40 + i64::from(round) * 7)).collect(),
            results,
            failing: HashSet::from([3]),
            ..FakeSeason::default()
        };

        let standings = Aggregator::new(&season)
            .aggregate_season(2025, now())
            .await
            .unwrap();

        assert_eq!(*season.requested.lock().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(standings.processed_rounds, vec![1, 2, 4, 5]);
        assert_eq!(
            standings.outcome,
            Outcome::Partial {
                skipped_rounds: vec![3]
            }
        );
        assert!((points_of(&standings, "Driver A") - 12.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_timeout_is_skipped_not_fatal() {
        let season = FakeSeason {
            events: vec![event(1, -14), event(2, -7)],
            results: HashMap::from([
                (1, vec![row("Driver X", "T9", 25.0)]),
                (2, vec![row("Driver C", "T3", 10.0)]),
            ]),
            hanging: HashSet::from([1]),
            ..FakeSeason::default()
        };

        let standings = Aggregator::new(&season)
            .with_fetch_timeout(Duration::from_millis(50))
            .aggregate_season(2025, now())
            .await
            .unwrap();

        assert_eq!(
            standings.outcome,
            Outcome::Partial {
                skipped_rounds: vec![1]
            }
        );
        assert!(standings.outcome.is_success());
        assert_eq!(standings.drivers.len(), 1);
        assert_eq!(standings.drivers[0].name, "Driver C");
        assert!((standings.drivers[0].points - 10.0).abs() < f64::EPSILON);
        assert_eq!(standings.constructors.len(), 1);
        assert_eq!(standings.constructors[0].name, "T3");
        assert!((standings.constructors[0].points - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_no_eligible_events() {
        let season = FakeSeason {
            events: vec![event(1, 5), event(2, 12)],
            ..FakeSeason::default()
        };

        let standings = Aggregator::new(&season)
            .aggregate_season(2025, now())
            .await
            .unwrap();

        assert_eq!(standings.outcome, Outcome::NoEligibleEvents);
        assert!(standings.drivers.is_empty());
        assert!(season.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_results_available() {
        let season = FakeSeason {
            events: vec![event(1, -14), event(2, -7)],
            failing: HashSet::from([1, 2]),
            ..FakeSeason::default()
        };

        let standings = Aggregator::new(&season)
            .aggregate_season(2025, now())
            .await
            .unwrap();

        assert_eq!(
            standings.outcome,
            Outcome::NoResultsAvailable {
                skipped_rounds: vec![1, 2]
            }
        );
        assert!(standings.drivers.is_empty());
        assert_ne!(
            standings.outcome.message(),
            Outcome::NoEligibleEvents.message()
        );
    }

    #[tokio::test]
    async fn test_schedule_failure_is_fatal() {
        let season = FakeSeason {
            schedule_fails: true,
            ..FakeSeason::default()
        };

        let err = Aggregator::new(&season)
            .aggregate_season(2025, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_progress_snapshots_in_round_order() {
        let season = FakeSeason {
            events: vec![event(2, -7), event(1, -14), event(3, -1)],
            results: HashMap::from([
                (1, vec![row("Driver A", "T1", 25.0)]),
                (3, vec![row("Driver B", "T2", 25.0), row("Driver A", "T1", 1.0)]),
            ]),
            ..FakeSeason::default()
        };
        let (tx, mut rx) = mpsc::channel(8);

        let standings = Aggregator::new(&season)
            .with_progress(tx)
            .aggregate(2025, &season.events, now())
            .await
            .unwrap();

        let mut snapshots = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            snapshots.push(snapshot);
        }
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].round, 1);
        assert_eq!(snapshots[0].processed, 1);
        assert_eq!(snapshots[0].eligible, 3);
        assert_eq!(snapshots[0].drivers.len(), 1);
        assert_eq!(snapshots[1].round, 3);
        assert_eq!(snapshots[1].drivers, standings.drivers);
        assert_eq!(
            standings.outcome,
            Outcome::Partial {
                skipped_rounds: vec![2]
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_fetch() {
        let season = FakeSeason {
            events: vec![event(1, -14), event(2, -7)],
            results: HashMap::from([(1, vec![row("Driver A", "T1", 25.0)])]),
            ..FakeSeason::default()
        };
        let token = CancelToken::new();
        token.cancel();

        let err = Aggregator::new(&season)
            .with_cancel_token(token)
            .aggregate_season(2025, now())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(season.requested.lock().unwrap().is_empty());
    }

    /// Cancels the run while serving one round's results.
    struct CancellingSource {
        inner: FakeSeason,
        token: CancelToken,
        cancel_on: u32,
    }

    #[async_trait::async_trait]
    impl SeasonSource for CancellingSource {
        async fn schedule(&self, year: i32) -> Result<Vec<Event>> {
            self.inner.schedule(year).await
        }

        async fn session_results(
            &self,
            year: i32,
            round: u32,
            session: SessionType,
        ) -> Result<Vec<ResultRow>> {
            if round == self.cancel_on {
                self.token.cancel();
            }
            self.inner.session_results(year, round, session).await
        }
    }

    fn cancelling_source(rounds: u32, cancel_on: u32, token: &CancelToken) -> CancellingSource {
        CancellingSource {
            inner: FakeSeason {
                events: (1..=rounds)
                    .map(|round| event(round, -28 + i64::from(round) * 7))
                    .collect(),
                results: (1..=rounds)
                    .map(|round| (round, vec![row("Driver A", "T1", 25.0)]))
                    .collect(),
                ..FakeSeason::default()
            },
            token: token.clone(),
            cancel_on,
        }
    }

    #[tokio::test]
    async fn test_cancelled_mid_run_stops_before_next_fetch() {
        let token = CancelToken::new();
        let source = cancelling_source(3, 2, &token);
        let (tx, mut rx) = mpsc::channel(4);

        let err = Aggregator::new(&source)
            .with_cancel_token(token)
            .with_progress(tx)
            .aggregate_season(2025, now())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(*source.inner.requested.lock().unwrap(), vec![1, 2]);
        // Round 2 finished after the cancel and is not published
        assert_eq!(rx.try_recv().unwrap().round, 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancelled_during_final_fetch_returns_no_standings() {
        let token = CancelToken::new();
        let source = cancelling_source(1, 1, &token);
        let (tx, mut rx) = mpsc::channel(4);

        let result = Aggregator::new(&source)
            .with_cancel_token(token.clone())
            .with_progress(tx)
            .aggregate_season(2025, now())
            .await;

        assert!(token.is_cancelled());
        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(*source.inner.requested.lock().unwrap(), vec![1]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sprint_session_is_forwarded() {
        struct SessionRecorder(Mutex<Vec<SessionType>>);

        #[async_trait::async_trait]
        impl SeasonSource for SessionRecorder {
            async fn schedule(&self, _year: i32) -> Result<Vec<Event>> {
                Ok(Vec::new())
            }

            async fn session_results(
                &self,
                _year: i32,
                _round: u32,
                session: SessionType,
            ) -> Result<Vec<ResultRow>> {
                self.0.lock().unwrap().push(session);
                Ok(Vec::new())
            }
        }

        let mut sprint_weekend = event(1, -7);
        sprint_weekend.session3 = Some("Sprint".to_string());

        let recorder = SessionRecorder(Mutex::new(Vec::new()));
        let standings = Aggregator::new(&recorder)
            .with_session(SessionType::Sprint)
            .aggregate(2025, &[sprint_weekend], now())
            .await
            .unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec![SessionType::Sprint]);
        assert_eq!(standings.session, SessionType::Sprint);
        assert_eq!(standings.outcome, Outcome::Complete);
    }

    #[tokio::test]
    async fn test_sprint_run_skips_conventional_weekends() {
        let mut sprint_weekend = event(2, -14);
        sprint_weekend.event_format = Some("sprint_qualifying".to_string());
        sprint_weekend.session3 = Some("Sprint".to_string());
        let season = FakeSeason {
            events: vec![event(1, -21), sprint_weekend, event(3, -7)],
            results: HashMap::from([(2, vec![row("Driver A", "T1", 8.0)])]),
            ..FakeSeason::default()
        };

        let standings = Aggregator::new(&season)
            .with_session(SessionType::Sprint)
            .aggregate_season(2025, now())
            .await
            .unwrap();

        assert_eq!(*season.requested.lock().unwrap(), vec![2]);
        assert_eq!(standings.eligible_events, 1);
        assert_eq!(standings.processed_rounds, vec![2]);
        assert_eq!(standings.outcome, Outcome::Complete);
        assert!(standings.outcome.message().is_none());
        assert!((points_of(&standings, "Driver A") - 8.0).abs() < f64::EPSILON);
    }
}
