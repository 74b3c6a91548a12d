//! Lap timing and car telemetry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One timed lap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Session time at which the lap was set.
    #[serde(default)]
    pub time: Option<String>,
    /// Three-letter driver code.
    #[serde(default)]
    pub driver: String,
    /// Car number, as a string.
    #[serde(default)]
    pub driver_number: String,
    /// Lap time.
    #[serde(default)]
    pub lap_time: Option<String>,
    /// Lap number.
    #[serde(default)]
    pub lap_number: Option<u32>,
    /// Stint number.
    #[serde(default)]
    pub stint: Option<u32>,
    /// Session time of leaving the pit lane.
    #[serde(default)]
    pub pit_out_time: Option<String>,
    /// Session time of entering the pit lane.
    #[serde(default)]
    pub pit_in_time: Option<String>,
    /// Sector 1 time.
    #[serde(default)]
    pub sector1_time: Option<String>,
    /// Sector 2 time.
    #[serde(default)]
    pub sector2_time: Option<String>,
    /// Sector 3 time.
    #[serde(default)]
    pub sector3_time: Option<String>,
    /// Tyre compound, e.g. "SOFT".
    #[serde(default)]
    pub compound: Option<String>,
    /// Laps driven on this set of tyres.
    #[serde(default)]
    pub tyre_life: Option<u32>,
    /// Track status code during the lap.
    #[serde(default)]
    pub track_status: Option<String>,
    /// Whether this was the driver's best lap so far.
    #[serde(default)]
    pub is_personal_best: bool,
}

impl Lap {
    /// Lap time as a duration, if present and well-formed.
    #[must_use]
    pub fn lap_duration(&self) -> Option<Duration> {
        self.lap_time.as_deref().and_then(parse_timing)
    }
}

/// Lap timing for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LapData {
    /// Championship year.
    pub year: i32,
    /// Round number.
    pub round: u32,
    /// Session code.
    pub session_type: String,
    /// Driver filter the server applied, if any.
    #[serde(default)]
    pub driver_filter: Option<String>,
    /// Laps in session order.
    #[serde(default)]
    pub laps: Vec<Lap>,
    /// Number of laps returned.
    #[serde(default)]
    pub total_laps: usize,
}

/// One car-data sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Session time of the sample.
    #[serde(default)]
    pub session_time: Option<String>,
    /// Speed in km/h.
    #[serde(default)]
    pub speed: Option<u32>,
    /// Engine revolutions per minute.
    #[serde(default)]
    pub rpm: Option<u32>,
    /// Selected gear.
    #[serde(default)]
    pub gear: Option<u8>,
    /// Throttle application, percent.
    #[serde(default)]
    pub throttle: Option<u32>,
    /// Whether the brake was applied.
    #[serde(default)]
    pub brake: bool,
    /// DRS flap state code.
    #[serde(default)]
    pub drs: Option<u32>,
}

/// Telemetry trace for one lap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Championship year.
    pub year: i32,
    /// Round number.
    pub round: u32,
    /// Session code.
    pub session_type: String,
    /// Car number.
    #[serde(default)]
    pub driver: String,
    /// Lap number.
    pub lap_number: u32,
    /// Samples in time order.
    #[serde(default)]
    pub telemetry: Vec<TelemetrySample>,
    /// Number of samples returned.
    #[serde(default)]
    pub data_points: usize,
}

impl Telemetry {
    /// Highest speed in the trace.
    #[must_use]
    pub fn top_speed(&self) -> Option<u32> {
        self.telemetry.iter().filter_map(|sample| sample.speed).max()
    }

    /// Share of samples with the brake applied, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn braking_ratio(&self) -> f64 {
        if self.telemetry.is_empty() {
            return 0.0;
        }
        let braking = self.telemetry.iter().filter(|sample| sample.brake).count();
        braking as f64 / self.telemetry.len() as f64
    }
}

/// Parse a timing string of the form `"D days HH:MM:SS.ffffff"`.
///
/// The day prefix and the fractional part are optional. Returns `None` for
/// negative or malformed values (including `"NaT"`).
#[must_use]
pub fn parse_timing(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (days, clock) = match raw
        .split_once(" days ")
        .or_else(|| raw.split_once(" day "))
    {
        Some((days, clock)) => (days.trim().parse::<u64>().ok()?, clock.trim()),
        None => (0, raw),
    };

    let mut fields = clock.split(':');
    let hours: u64 = fields.next()?.parse().ok()?;
    let minutes: u64 = fields.next()?.parse().ok()?;
    let seconds_field = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let (seconds, fraction) = seconds_field.split_once('.').unwrap_or((seconds_field, ""));
    let seconds: u64 = seconds.parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let nanos = if fraction.is_empty() {
        0
    } else {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits: String = fraction.chars().take(9).collect();
        format!("{digits:0<9}").parse::<u32>().ok()?
    };

    Some(Duration::new(
        days * 86_400 + hours * 3_600 + minutes * 60 + seconds,
        nanos,
    ))
}

/// Render a lap or sector time as `M:SS.mmm` (or `SS.mmm` under a minute).
#[must_use]
pub fn format_lap_time(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    if minutes == 0 {
        format!("{seconds}.{millis:03}")
    } else {
        format!("{minutes}:{seconds:02}.{millis:03}")
    }
}

/// Render a raw timing string for display, falling back to `-`.
#[must_use]
pub fn display_timing(raw: Option<&str>) -> String {
    match raw {
        Some(text) => parse_timing(text).map_or_else(|| text.to_string(), format_lap_time),
        None => "-".to_string(),
    }
}
