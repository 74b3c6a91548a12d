//! Event time classification.
//!
//! Decides whether a race weekend is over, happening now, or still to come,
//! and produces the countdown labels shown next to events. Every function here
//! is pure: the caller supplies "now".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Event;

/// Half-width of the race week window, in days.
pub const RACE_WEEK_WINDOW_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Where an event sits relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// More than three days ago.
    Past,
    /// Within three days either side of now.
    Current,
    /// More than three days away.
    Upcoming,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Past => write!(f, "past"),
            Self::Current => write!(f, "current"),
            Self::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// The outcome of classifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Bucket the event falls into.
    pub bucket: Bucket,
    /// Whole days until the reference moment, rounded up; negative once passed.
    pub days_until: i64,
    /// The session timestamp the classification was based on.
    pub reference: DateTime<Utc>,
}

/// Signed whole days from `now` until `reference`, rounded towards positive infinity.
#[must_use]
pub fn days_until(reference: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (reference - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Map a day offset to its bucket.
#[must_use]
pub fn bucket_for(days_until: i64) -> Bucket {
    if days_until < -RACE_WEEK_WINDOW_DAYS {
        Bucket::Past
    } else if days_until > RACE_WEEK_WINDOW_DAYS {
        Bucket::Upcoming
    } else {
        Bucket::Current
    }
}

/// Classify an event relative to `now`.
///
/// Returns `None` when the event has no session timestamp and no event date.
#[must_use]
pub fn classify(event: &Event, now: DateTime<Utc>) -> Option<Classification> {
    let reference = event.reference_time()?;
    let days_until = days_until(reference, now);
    Some(Classification {
        bucket: bucket_for(days_until),
        days_until,
        reference,
    })
}

/// Human-readable countdown for a day offset.
#[must_use]
pub fn countdown_label(days_until: i64) -> String {
    match days_until {
        d if d < 0 => "race week".to_string(),
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d @ 2..=7 => format!("in {d} days"),
        d => format!("in {} weeks", d / 7),
    }
}

/// An event paired with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedEvent<'a> {
    /// The event.
    pub event: &'a Event,
    /// Its classification.
    #[serde(flatten)]
    pub classification: Classification,
}

impl ClassifiedEvent<'_> {
    /// Countdown label for this event.
    #[must_use]
    pub fn countdown(&self) -> String {
        countdown_label(self.classification.days_until)
    }
}

/// A season's events split by bucket, schedule order preserved within each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Calendar<'a> {
    /// Events more than three days in the past.
    pub past: Vec<ClassifiedEvent<'a>>,
    /// Events in the race week window.
    pub current: Vec<ClassifiedEvent<'a>>,
    /// Events more than three days away.
    pub upcoming: Vec<ClassifiedEvent<'a>>,
    /// Events without any usable date.
    pub unscheduled: Vec<&'a Event>,
}

impl Calendar<'_> {
    /// Total number of events, classified or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.past.len() + self.current.len() + self.upcoming.len() + self.unscheduled.len()
    }

    /// Whether the calendar has no events at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split events into past, current and upcoming buckets.
#[must_use]
pub fn organize(events: &[Event], now: DateTime<Utc>) -> Calendar<'_> {
    let mut calendar = Calendar::default();
    for event in events {
        match classify(event, now) {
            Some(classification) => {
                let entry = ClassifiedEvent {
                    event,
                    classification,
                };
                match classification.bucket {
                    Bucket::Past => calendar.past.push(entry),
                    Bucket::Current => calendar.current.push(entry),
                    Bucket::Upcoming => calendar.upcoming.push(entry),
                }
            }
            None => calendar.unscheduled.push(event),
        }
    }
    calendar
}

/// Events whose reference moment is strictly after `now`, earliest first.
fn future_events(events: &[Event], now: DateTime<Utc>) -> Vec<ClassifiedEvent<'_>> {
    let mut future: Vec<ClassifiedEvent<'_>> = events
        .iter()
        .filter_map(|event| {
            classify(event, now).map(|classification| ClassifiedEvent {
                event,
                classification,
            })
        })
        .filter(|entry| entry.classification.reference > now)
        .collect();
    future.sort_by_key(|entry| entry.classification.reference);
    future
}

/// The earliest event whose reference moment is strictly in the future.
#[must_use]
pub fn next_event(events: &[Event], now: DateTime<Utc>) -> Option<ClassifiedEvent<'_>> {
    future_events(events, now).into_iter().next()
}

/// The event a dashboard should feature.
///
/// The first event in the race week window, in schedule order; when none is
/// in the window, the next future event even if it is weeks away.
#[must_use]
pub fn featured_event(events: &[Event], now: DateTime<Utc>) -> Option<ClassifiedEvent<'_>> {
    events
        .iter()
        .find_map(|event| {
            classify(event, now)
                .filter(|classification| classification.bucket == Bucket::Current)
                .map(|classification| ClassifiedEvent {
                    event,
                    classification,
                })
        })
        .or_else(|| next_event(events, now))
}

/// What the dashboard page shows: a featured event and the ones after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView<'a> {
    /// The current or next event.
    pub featured: Option<ClassifiedEvent<'a>>,
    /// Events past the race week window, excluding the featured one,
    /// earliest first.
    pub upcoming: Vec<ClassifiedEvent<'a>>,
}

/// Build the dashboard selection for a season.
#[must_use]
pub fn dashboard(events: &[Event], now: DateTime<Utc>, upcoming_limit: usize) -> DashboardView<'_> {
    let featured = featured_event(events, now);
    let upcoming = future_events(events, now)
        .into_iter()
        .filter(|entry| entry.classification.bucket == Bucket::Upcoming)
        .filter(|entry| {
            !featured.is_some_and(|featured| std::ptr::eq(featured.event, entry.event))
        })
        .take(upcoming_limit)
        .collect();
    DashboardView { featured, upcoming }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn race_at(round: u32, offset: Duration) -> Event {
        Event {
            round_number: Some(round),
            event_name: format!("Round {round}"),
            session5: Some("Race".to_string()),
            session5_date: Some(now() + offset),
            ..Event::default()
        }
    }

    #[test]
    fn test_countdown_label_boundaries() {
        assert_eq!(countdown_label(-5), "race week");
        assert_eq!(countdown_label(-1), "race week");
        assert_eq!(countdown_label(0), "today");
        assert_eq!(countdown_label(1), "tomorrow");
        assert_eq!(countdown_label(2), "in 2 days");
        assert_eq!(countdown_label(7), "in 7 days");
        assert_eq!(countdown_label(8), "in 1 weeks");
        assert_eq!(countdown_label(13), "in 1 weeks");
        assert_eq!(countdown_label(14), "in 2 weeks");
        assert_eq!(countdown_label(15), "in 2 weeks");
    }

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(now(), now()), 0);
        assert_eq!(days_until(now() + Duration::hours(12), now()), 1);
        assert_eq!(days_until(now() + Duration::days(1), now()), 1);
        assert_eq!(
            days_until(now() + Duration::days(1) + Duration::milliseconds(1), now()),
            2
        );
        assert_eq!(days_until(now() - Duration::hours(12), now()), 0);
        assert_eq!(days_until(now() - Duration::days(1), now()), -1);
        assert_eq!(days_until(now() - Duration::hours(36), now()), -1);
        assert_eq!(days_until(now() - Duration::hours(49), now()), -2);
    }

    #[test]
    fn test_bucket_for_window() {
        for days in -3..=3 {
            assert_eq!(bucket_for(days), Bucket::Current, "days = {days}");
        }
        assert_eq!(bucket_for(-4), Bucket::Past);
        assert_eq!(bucket_for(4), Bucket::Upcoming);
        assert_eq!(bucket_for(i64::MIN), Bucket::Past);
        assert_eq!(bucket_for(i64::MAX), Bucket::Upcoming);
    }

    #[test]
    fn test_classify_is_total_and_idempotent() {
        for days in -30..=30 {
            let event = race_at(1, Duration::days(days));
            let first = classify(&event, now()).unwrap();
            let second = classify(&event, now()).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.days_until, days);
            let expected = if days < -3 {
                Bucket::Past
            } else if days > 3 {
                Bucket::Upcoming
            } else {
                Bucket::Current
            };
            assert_eq!(first.bucket, expected, "days = {days}");
        }
    }

    #[test]
    fn test_classify_without_dates() {
        let event = Event {
            round_number: Some(1),
            ..Event::default()
        };
        assert!(classify(&event, now()).is_none());
    }

    #[test]
    fn test_classify_uses_event_date_fallback() {
        let event = Event {
            event_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 10),
            ..Event::default()
        };
        let classification = classify(&event, now()).unwrap();
        // 2025-06-10T00:00Z is 8.5 days after 2025-06-01T12:00Z
        assert_eq!(classification.days_until, 9);
        assert_eq!(classification.bucket, Bucket::Upcoming);
    }

    #[test]
    fn test_organize_preserves_order_and_buckets() {
        let events = vec![
            race_at(1, Duration::days(-20)),
            race_at(2, Duration::days(-10)),
            race_at(3, Duration::days(2)),
            race_at(4, Duration::days(12)),
            Event {
                round_number: Some(5),
                ..Event::default()
            },
        ];
        fn rounds(entries: &[ClassifiedEvent<'_>]) -> Vec<u32> {
            entries.iter().map(|e| e.event.round()).collect()
        }

        let calendar = organize(&events, now());
        assert_eq!(rounds(&calendar.past), vec![1, 2]);
        assert_eq!(rounds(&calendar.current), vec![3]);
        assert_eq!(rounds(&calendar.upcoming), vec![4]);
        assert_eq!(calendar.unscheduled.len(), 1);
        assert_eq!(calendar.len(), 5);
        assert!(!calendar.is_empty());
    }

    #[test]
    fn test_featured_prefers_current_event() {
        let events = vec![
            race_at(1, Duration::days(-10)),
            race_at(2, Duration::days(-2)),
            race_at(3, Duration::days(5)),
        ];
        let featured = featured_event(&events, now()).unwrap();
        assert_eq!(featured.event.round(), 2);
        assert_eq!(featured.classification.bucket, Bucket::Current);
        assert_eq!(featured.countdown(), "race week");
    }

    #[test]
    fn test_featured_falls_back_to_next_event() {
        let events = vec![
            race_at(1, Duration::days(-10)),
            race_at(2, Duration::days(20)),
            race_at(3, Duration::days(34)),
        ];
        let featured = featured_event(&events, now()).unwrap();
        assert_eq!(featured.event.round(), 2);
        assert_eq!(featured.classification.bucket, Bucket::Upcoming);
        assert_eq!(featured.countdown(), "in 2 weeks");
    }

    #[test]
    fn test_next_event_is_earliest_future_reference() {
        // Out-of-order schedule: the earliest timestamp wins, not the first entry
        let events = vec![
            race_at(2, Duration::days(30)),
            race_at(1, Duration::days(9)),
            race_at(0, Duration::days(-1)),
        ];
        assert_eq!(next_event(&events, now()).unwrap().event.round(), 1);
    }

    #[test]
    fn test_featured_none_after_season() {
        let events = vec![race_at(1, Duration::days(-40)), race_at(2, Duration::days(-30))];
        assert!(featured_event(&events, now()).is_none());
        assert!(next_event(&events, now()).is_none());
    }

    #[test]
    fn test_dashboard_lists_upcoming_after_featured() {
        let events = vec![
            race_at(1, Duration::days(-8)),
            race_at(2, Duration::days(1)),
            race_at(3, Duration::days(8)),
            race_at(4, Duration::days(15)),
            race_at(5, Duration::days(22)),
            race_at(6, Duration::days(29)),
        ];
        let view = dashboard(&events, now(), 3);
        assert_eq!(view.featured.unwrap().event.round(), 2);
        let rounds: Vec<u32> = view.upcoming.iter().map(|e| e.event.round()).collect();
        assert_eq!(rounds, vec![3, 4, 5]);
    }

    #[test]
    fn test_dashboard_upcoming_skips_race_week_events() {
        let events = vec![
            race_at(1, Duration::days(-2)),
            race_at(2, Duration::days(2)),
            race_at(3, Duration::days(9)),
        ];
        let view = dashboard(&events, now(), 3);
        assert_eq!(view.featured.unwrap().event.round(), 1);
        let rounds: Vec<u32> = view.upcoming.iter().map(|e| e.event.round()).collect();
        assert_eq!(rounds, vec![3]);
    }

    #[test]
    fn test_dashboard_with_fallback_featured() {
        let events = vec![
            race_at(1, Duration::days(-8)),
            race_at(2, Duration::days(10)),
            race_at(3, Duration::days(17)),
        ];
        let view = dashboard(&events, now(), 3);
        assert_eq!(view.featured.unwrap().event.round(), 2);
        let rounds: Vec<u32> = view.upcoming.iter().map(|e| e.event.round()).collect();
        assert_eq!(rounds, vec![3]);
    }

    #[test]
    fn test_bucket_display() {
        assert_eq!(Bucket::Past.to_string(), "past");
        assert_eq!(Bucket::Current.to_string(), "current");
        assert_eq!(Bucket::Upcoming.to_string(), "upcoming");
    }

    #[test]
    fn test_classified_event_serializes_flat() {
        let event = race_at(7, Duration::days(3));
        let entry = ClassifiedEvent {
            event: &event,
            classification: classify(&event, now()).unwrap(),
        };
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["bucket"], "current");
        assert_eq!(json["days_until"], 3);
        assert_eq!(json["event"]["round_number"], 7);
    }
}
