//! Session identifiers, classification results and driver lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A timed on-track segment of a race weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionType {
    /// Grand prix.
    #[default]
    #[serde(rename = "R")]
    Race,
    /// Qualifying.
    #[serde(rename = "Q")]
    Qualifying,
    /// Sprint race.
    #[serde(rename = "S")]
    Sprint,
    /// First free practice.
    #[serde(rename = "FP1")]
    Practice1,
    /// Second free practice.
    #[serde(rename = "FP2")]
    Practice2,
    /// Third free practice.
    #[serde(rename = "FP3")]
    Practice3,
}

impl SessionType {
    /// All session types, in weekend order.
    pub const ALL: [Self; 6] = [
        Self::Practice1,
        Self::Practice2,
        Self::Practice3,
        Self::Sprint,
        Self::Qualifying,
        Self::Race,
    ];

    /// The short code the API expects in URLs.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Race => "R",
            Self::Qualifying => "Q",
            Self::Sprint => "S",
            Self::Practice1 => "FP1",
            Self::Practice2 => "FP2",
            Self::Practice3 => "FP3",
        }
    }

    /// Human-readable session name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Race => "Race",
            Self::Qualifying => "Qualifying",
            Self::Sprint => "Sprint",
            Self::Practice1 => "Practice 1",
            Self::Practice2 => "Practice 2",
            Self::Practice3 => "Practice 3",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SessionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|session| session.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| Error::InvalidSessionType {
                code: code.to_string(),
            })
    }
}

/// One driver's classification in one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Finishing position; absent for retirements and non-starters.
    #[serde(default)]
    pub position: Option<u32>,
    /// Permanent car number, as a string.
    #[serde(default)]
    pub driver_number: String,
    /// Three-letter driver code.
    #[serde(default)]
    pub abbreviation: Option<String>,
    /// Driver full name.
    #[serde(default)]
    pub full_name: String,
    /// Team name.
    #[serde(default)]
    pub team_name: String,
    /// Team colour as hex without the leading `#`.
    #[serde(default)]
    pub team_color: Option<String>,
    /// Starting grid slot.
    #[serde(default)]
    pub grid_position: Option<u32>,
    /// Championship points scored in this session.
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: f64,
    /// Finishing status, e.g. "Finished", "+1 Lap", "Retired".
    #[serde(default)]
    pub status: Option<String>,
    /// Gap or total race time.
    #[serde(default)]
    pub time: Option<String>,
}

/// Interpret a wire value as championship points.
///
/// Numbers and numeric strings are accepted; anything else, including
/// negative or non-finite values, counts as zero.
#[must_use]
pub fn parse_points(value: &Value) -> f64 {
    let points = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if points.is_finite() && points > 0.0 {
        points
    } else {
        0.0
    }
}

fn lenient_points<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_points(&value))
}

/// Classification of a single session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    /// Championship year.
    pub year: i32,
    /// Round number.
    pub round: u32,
    /// Session code.
    pub session_type: String,
    /// One row per classified driver.
    #[serde(default)]
    pub results: Vec<ResultRow>,
}

/// A driver taking part in a session or season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverEntry {
    /// Three-letter driver code.
    #[serde(default)]
    pub abbreviation: String,
    /// Driver full name.
    #[serde(default)]
    pub full_name: String,
    /// Car number. The session endpoint calls this `driver_number`.
    #[serde(default, alias = "driver_number")]
    pub number: String,
    /// Team name.
    #[serde(default)]
    pub team_name: String,
    /// Team colour as hex without the leading `#`.
    #[serde(default)]
    pub team_color: Option<String>,
}

/// Drivers entered in one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDrivers {
    /// Championship year.
    pub year: i32,
    /// Round number.
    pub round: u32,
    /// Session code.
    pub session_type: String,
    /// Drivers in result order.
    #[serde(default)]
    pub drivers: Vec<DriverEntry>,
}

/// The season's driver line-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Championship year.
    pub year: i32,
    /// Number of drivers listed.
    #[serde(default)]
    pub total_drivers: usize,
    /// Drivers sorted by team, then number.
    #[serde(default)]
    pub drivers: Vec<DriverEntry>,
}
