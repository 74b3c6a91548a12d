//! Race control messages, circuit metadata and API health.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message published by race control during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceControlMessage {
    /// Time the message was published.
    #[serde(default)]
    pub time: Option<String>,
    /// Category, e.g. "Flag", "SafetyCar", "CarEvent", "Drs", "Other".
    #[serde(default)]
    pub category: Option<String>,
    /// Message text.
    #[serde(default)]
    pub message: Option<String>,
    /// Flag shown, e.g. "YELLOW" or "CHEQUERED".
    #[serde(default)]
    pub flag: Option<String>,
    /// Scope of the message, e.g. "Track", "Sector", "Driver".
    #[serde(default)]
    pub scope: Option<String>,
    /// Track sector the message applies to.
    #[serde(default)]
    pub sector: Option<String>,
}

impl RaceControlMessage {
    /// Whether this message is about a flag being shown.
    #[must_use]
    pub fn is_flag(&self) -> bool {
        self.category.as_deref() == Some("Flag") || self.flag.is_some()
    }
}

/// Race control messages for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceControlLog {
    /// Championship year.
    pub year: i32,
    /// Round number.
    pub round: u32,
    /// Session code.
    pub session_type: String,
    /// Messages in publication order.
    #[serde(default)]
    pub messages: Vec<RaceControlMessage>,
    /// Number of messages returned.
    #[serde(default)]
    pub total_messages: usize,
}

/// A numbered corner of a circuit.
///
/// The API forwards corner records verbatim, so the fields are kept as a
/// JSON map with typed accessors for the common keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corner(pub Map<String, Value>);

impl Corner {
    fn field(&self, key: &str) -> Option<&Value> {
        self.0
            .get(key)
            .or_else(|| self.0.get(&key.to_ascii_lowercase()))
    }

    /// Corner number, with its letter suffix if any (e.g. "9a").
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let number = match self.field("Number")? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => return None,
        };
        let letter = self
            .field("Letter")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Some(format!("{number}{letter}"))
    }

    /// Distance from the start line in metres.
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.field("Distance").and_then(Value::as_f64)
    }

    /// Corner angle in degrees.
    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        self.field("Angle").and_then(Value::as_f64)
    }
}

/// Track layout details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitLayout {
    /// Rotation of the track map in degrees.
    #[serde(default)]
    pub rotation: Option<f64>,
    /// Corners in lap order.
    #[serde(default)]
    pub corners: Vec<Corner>,
}

/// Event metadata attached to circuit information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Circuit location.
    #[serde(default)]
    pub location: String,
    /// Host country.
    #[serde(default)]
    pub country: String,
    /// Event name.
    #[serde(default)]
    pub event_name: String,
    /// Weekend format.
    #[serde(default)]
    pub event_format: String,
    /// Full sponsored event name.
    #[serde(default)]
    pub official_name: Option<String>,
}

/// Circuit information for one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitDetails {
    /// Championship year.
    pub year: i32,
    /// Round number.
    pub round: u32,
    /// Track layout.
    #[serde(default)]
    pub circuit_info: CircuitLayout,
    /// Event metadata.
    #[serde(default)]
    pub event_info: EventInfo,
    /// Lap length in kilometres, when derivable.
    #[serde(default)]
    pub lap_length_km: Option<f64>,
}

/// API connectivity status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// "healthy" when the API is up.
    pub status: String,
    /// Free-form status message.
    #[serde(default)]
    pub message: String,
}

impl Health {
    /// Whether the API reported itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
