//! Race weekend schedule types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::SessionType;

/// One race weekend as published in the season schedule.
///
/// Session names and timestamps are kept in the flat `sessionN`/`sessionN_date`
/// layout the API uses; [`Event::sessions`] exposes them as a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Ordinal position in the season; absent for pre-season testing.
    pub round_number: Option<u32>,
    /// Host country.
    #[serde(default)]
    pub country: String,
    /// Host city or circuit location.
    #[serde(default)]
    pub location: String,
    /// Event name, e.g. "Monaco Grand Prix".
    #[serde(default)]
    pub event_name: String,
    /// Primary event date (usually race day).
    pub event_date: Option<NaiveDate>,
    /// Weekend format, e.g. "conventional" or "sprint_qualifying".
    #[serde(default)]
    pub event_format: Option<String>,
    /// First session name.
    #[serde(default)]
    pub session1: Option<String>,
    /// First session start (UTC).
    #[serde(default)]
    pub session1_date: Option<DateTime<Utc>>,
    /// Second session name.
    #[serde(default)]
    pub session2: Option<String>,
    /// Second session start (UTC).
    #[serde(default)]
    pub session2_date: Option<DateTime<Utc>>,
    /// Third session name.
    #[serde(default)]
    pub session3: Option<String>,
    /// Third session start (UTC).
    #[serde(default)]
    pub session3_date: Option<DateTime<Utc>>,
    /// Fourth session name.
    #[serde(default)]
    pub session4: Option<String>,
    /// Fourth session start (UTC).
    #[serde(default)]
    pub session4_date: Option<DateTime<Utc>>,
    /// Fifth session name (the race in every weekend format).
    #[serde(default)]
    pub session5: Option<String>,
    /// Fifth session start (UTC).
    #[serde(default)]
    pub session5_date: Option<DateTime<Utc>>,
}

/// A named session slot of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSession<'a> {
    /// Slot number, 1 through 5.
    pub slot: u8,
    /// Session name, e.g. "Practice 1".
    pub name: &'a str,
    /// Session start, if announced.
    pub starts_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Round number, or 0 for events without one.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round_number.unwrap_or(0)
    }

    /// Start of the race session, if scheduled.
    #[must_use]
    pub fn race_time(&self) -> Option<DateTime<Utc>> {
        self.session5_date
    }

    /// The moment used for countdowns and past/future decisions.
    ///
    /// Resolved as session 5, then session 4, then the event date at
    /// midnight UTC.
    #[must_use]
    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        self.session5_date.or(self.session4_date).or_else(|| {
            self.event_date
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
    }

    /// Whether this weekend runs `session`.
    ///
    /// The race is identified by its session 5 timestamp. Other sessions are
    /// matched by name against the published slots; a sprint weekend format
    /// also counts for [`SessionType::Sprint`]. Events that publish no
    /// session names are assumed to run every session.
    #[must_use]
    pub fn hosts(&self, session: SessionType) -> bool {
        if session == SessionType::Race {
            return self.race_time().is_some();
        }
        let sessions = self.sessions();
        if sessions.is_empty() {
            return true;
        }
        let sprint_format = session == SessionType::Sprint
            && self
                .event_format
                .as_deref()
                .is_some_and(|format| format.to_ascii_lowercase().starts_with("sprint"));
        sprint_format
            || sessions
                .iter()
                .any(|slot| slot.name.trim().eq_ignore_ascii_case(session.label()))
    }

    /// The populated session slots, in weekend order.
    #[must_use]
    pub fn sessions(&self) -> Vec<ScheduledSession<'_>> {
        [
            (1, &self.session1, self.session1_date),
            (2, &self.session2, self.session2_date),
            (3, &self.session3, self.session3_date),
            (4, &self.session4, self.session4_date),
            (5, &self.session5, self.session5_date),
        ]
        .into_iter()
        .filter_map(|(slot, name, starts_at)| {
            name.as_deref()
                .filter(|name| !name.is_empty())
                .map(|name| ScheduledSession {
                    slot,
                    name,
                    starts_at,
                })
        })
        .collect()
    }
}

/// A season schedule as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Championship year.
    pub year: i32,
    /// Events in calendar order.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Number of events reported by the API.
    #[serde(default)]
    pub total_events: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MONACO: &str = r#"{
        "round_number": 8,
        "country": "Monaco",
        "location": "Monaco",
        "event_name": "Monaco Grand Prix",
        "event_date": "2025-05-25",
        "event_format": "conventional",
        "session1": "Practice 1",
        "session1_date": "2025-05-23T11:30:00Z",
        "session2": "Practice 2",
        "session2_date": "2025-05-23T15:00:00Z",
        "session3": "Practice 3",
        "session3_date": "2025-05-24T10:30:00Z",
        "session4": "Qualifying",
        "session4_date": "2025-05-24T14:00:00Z",
        "session5": "Race",
        "session5_date": "2025-05-25T13:00:00Z"
    }"#;

    #[test]
    fn test_deserialize_event() {
        let event: Event = serde_json::from_str(MONACO).unwrap();
        assert_eq!(event.round(), 8);
        assert_eq!(event.event_name, "Monaco Grand Prix");
        assert_eq!(
            event.race_time(),
            Some(Utc.with_ymd_and_hms(2025, 5, 25, 13, 0, 0).unwrap())
        );
        assert_eq!(event.sessions().len(), 5);
        assert_eq!(event.sessions()[3].name, "Qualifying");
    }

    #[test]
    fn test_reference_prefers_session5() {
        let event: Event = serde_json::from_str(MONACO).unwrap();
        assert_eq!(event.reference_time(), event.session5_date);
    }

    #[test]
    fn test_reference_falls_back_to_session4() {
        let mut event: Event = serde_json::from_str(MONACO).unwrap();
        event.session5_date = None;
        assert_eq!(
            event.reference_time(),
            Some(Utc.with_ymd_and_hms(2025, 5, 24, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_reference_falls_back_to_event_date() {
        let event = Event {
            event_date: NaiveDate::from_ymd_opt(2025, 3, 16),
            ..Event::default()
        };
        assert_eq!(
            event.reference_time(),
            Some(Utc.with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_reference_none_without_dates() {
        assert!(Event::default().reference_time().is_none());
    }

    #[test]
    fn test_nulls_are_tolerated() {
        let json = r#"{
            "round_number": null,
            "country": "Bahrain",
            "location": "Sakhir",
            "event_name": "Pre-Season Testing",
            "event_date": null,
            "event_format": "testing",
            "session1": "Day 1",
            "session1_date": null,
            "session2": null,
            "session2_date": null
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.round(), 0);
        assert!(event.reference_time().is_none());
        assert_eq!(event.sessions().len(), 1);
        assert!(event.sessions()[0].starts_at.is_none());
    }

    #[test]
    fn test_hosts_session() {
        let monaco: Event = serde_json::from_str(MONACO).unwrap();
        assert!(monaco.hosts(SessionType::Race));
        assert!(monaco.hosts(SessionType::Qualifying));
        assert!(!monaco.hosts(SessionType::Sprint));

        let miami = Event {
            event_format: Some("sprint_qualifying".to_string()),
            session2: Some("Sprint Qualifying".to_string()),
            session3: Some("Sprint".to_string()),
            session5: Some("Race".to_string()),
            ..Event::default()
        };
        assert!(miami.hosts(SessionType::Sprint));
        assert!(!miami.hosts(SessionType::Practice2));

        // 2021-style sprint weekend without a session named "Sprint"
        let silverstone = Event {
            event_format: Some("sprint".to_string()),
            session3: Some("Sprint Qualifying".to_string()),
            ..Event::default()
        };
        assert!(silverstone.hosts(SessionType::Sprint));

        assert!(Event::default().hosts(SessionType::Sprint));
        assert!(!Event::default().hosts(SessionType::Race));
    }

    #[test]
    fn test_deserialize_schedule() {
        let json = format!(r#"{{"year": 2025, "events": [{MONACO}], "total_events": 1}}"#);
        let schedule: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule.year, 2025);
        assert_eq!(schedule.events.len(), 1);
        assert_eq!(schedule.total_events, 1);
    }
}
