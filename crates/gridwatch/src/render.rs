//! Text and JSON rendering of dashboard views and API payloads.
//!
//! Every renderer returns the full output as a `String` so the binary only
//! has to print it, and tests can inspect it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::classify::{self, Bucket, ClassifiedEvent, DashboardView};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::model::{
    display_timing, CircuitDetails, DriverEntry, Health, LapData, RaceControlLog, ResultRow,
    Schedule, SessionResults, Telemetry,
};
use crate::standings::{ConstructorStanding, DriverStanding, Standings, StandingsSnapshot};

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%a %d %b %Y %H:%M UTC").to_string()
}

fn format_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// Render points without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_points(points: f64) -> String {
    if points.fract().abs() < f64::EPSILON {
        format!("{points:.0}")
    } else {
        format!("{points}")
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn position(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |p| p.to_string())
}

fn status_text(entry: &ClassifiedEvent<'_>) -> String {
    match entry.classification.bucket {
        Bucket::Past => "completed".to_string(),
        Bucket::Current | Bucket::Upcoming => entry.countdown(),
    }
}

fn event_heading(entry: &ClassifiedEvent<'_>) -> String {
    let event = entry.event;
    format!(
        "Round {}: {} ({}, {})",
        event.round(),
        event.event_name,
        event.location,
        event.country
    )
}

/// Render the dashboard: featured event, next events, previous winner.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_dashboard(
    year: i32,
    view: &DashboardView<'_>,
    previous: Option<&SessionResults>,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&json!({
            "season": year,
            "featured": view.featured,
            "upcoming": view.upcoming,
            "previous_results": previous,
        }));
    }

    let mut lines = vec![format!("{year} season"), String::new()];
    match &view.featured {
        Some(featured) => {
            let label = if featured.classification.bucket == Bucket::Current {
                "Race week"
            } else {
                "Next race"
            };
            lines.push(format!("{label}: {}", event_heading(featured)));
            lines.push(format!(
                "  {} ({})",
                format_time(featured.classification.reference),
                featured.countdown()
            ));
            for session in featured.event.sessions() {
                let starts = session
                    .starts_at
                    .map_or_else(|| "TBC".to_string(), format_time);
                lines.push(format!("    {:<18} {starts}", session.name));
            }
        }
        None => lines.push("No upcoming races this season".to_string()),
    }

    if !view.upcoming.is_empty() {
        lines.push(String::new());
        lines.push("Coming up".to_string());
        for entry in &view.upcoming {
            lines.push(format!(
                "  {:>2}  {:<32} {}  {}",
                entry.event.round(),
                entry.event.event_name,
                format_date(entry.classification.reference),
                entry.countdown()
            ));
        }
    }

    if let Some(previous) = previous {
        lines.push(String::new());
        lines.push(format!("Last race (round {})", previous.round));
        for row in previous.results.iter().take(3) {
            lines.push(format!(
                "  P{}  {:<24} {:<20} {} pts",
                position(row.position),
                row.full_name,
                row.team_name,
                format_points(row.points)
            ));
        }
    }

    Ok(lines.join("\n"))
}

/// Render a season schedule with each event's status.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_schedule(schedule: &Schedule, now: DateTime<Utc>, format: OutputFormat) -> Result<String> {
    let calendar = classify::organize(&schedule.events, now);
    if format == OutputFormat::Json {
        return to_json(&json!({
            "year": schedule.year,
            "total_events": schedule.total_events,
            "past": calendar.past,
            "current": calendar.current,
            "upcoming": calendar.upcoming,
            "unscheduled": calendar.unscheduled,
        }));
    }

    let mut lines = Vec::with_capacity(schedule.events.len() + 2);
    if format == OutputFormat::Table {
        lines.push(format!(
            "{:>3}  {:<32} {:<20} {:<10}  {}",
            "Rnd", "Event", "Location", "Date", "Status"
        ));
        lines.push("-".repeat(80));
    }
    for event in &schedule.events {
        let classified = classify::classify(event, now).map(|classification| ClassifiedEvent {
            event,
            classification,
        });
        let date = classified
            .as_ref()
            .map_or_else(|| "TBC".to_string(), |c| format_date(c.classification.reference));
        let status = classified
            .as_ref()
            .map_or_else(|| "unscheduled".to_string(), status_text);
        match format {
            OutputFormat::Table => lines.push(format!(
                "{:>3}  {:<32} {:<20} {:<10}  {status}",
                event.round(),
                event.event_name,
                event.location,
                date
            )),
            _ => lines.push(format!(
                "Round {}: {} ({}) {date} [{status}]",
                event.round(),
                event.event_name,
                event.location
            )),
        }
    }
    if schedule.events.is_empty() {
        lines.push(format!("No events published for {}", schedule.year));
    }
    Ok(lines.join("\n"))
}

fn result_time(row: &ResultRow) -> String {
    match (&row.time, &row.status) {
        (Some(time), _) if !time.is_empty() => display_timing(Some(time)),
        (_, Some(status)) => status.clone(),
        _ => "-".to_string(),
    }
}

/// Render one session's classification.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_results(results: &SessionResults, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(results);
    }

    let mut lines = vec![format!(
        "{} round {} - {}",
        results.year, results.round, results.session_type
    )];
    if format == OutputFormat::Table {
        lines.push(format!(
            "{:>3}  {:>3}  {:<24} {:<22} {:>4}  {:<14} {:>4}",
            "Pos", "No", "Driver", "Team", "Grid", "Time/Status", "Pts"
        ));
        lines.push("-".repeat(84));
    }
    for row in &results.results {
        match format {
            OutputFormat::Table => lines.push(format!(
                "{:>3}  {:>3}  {:<24} {:<22} {:>4}  {:<14} {:>4}",
                position(row.position),
                row.driver_number,
                row.full_name,
                row.team_name,
                position(row.grid_position),
                result_time(row),
                format_points(row.points)
            )),
            _ => lines.push(format!(
                "P{} {} ({}) {} pts",
                position(row.position),
                row.full_name,
                row.team_name,
                format_points(row.points)
            )),
        }
    }
    if results.results.is_empty() {
        lines.push("No classification published".to_string());
    }
    Ok(lines.join("\n"))
}

fn driver_lines(drivers: &[DriverStanding], format: OutputFormat) -> Vec<String> {
    let mut lines = Vec::with_capacity(drivers.len() + 2);
    if format == OutputFormat::Table {
        lines.push(format!(
            "{:>3}  {:<24} {:<4} {:<22} {:>6}",
            "Pos", "Driver", "Code", "Team", "Pts"
        ));
        lines.push("-".repeat(64));
    }
    for (idx, driver) in drivers.iter().enumerate() {
        match format {
            OutputFormat::Table => lines.push(format!(
                "{:>3}  {:<24} {:<4} {:<22} {:>6}",
                idx + 1,
                driver.name,
                or_dash(driver.abbreviation.as_deref()),
                driver.team,
                format_points(driver.points)
            )),
            _ => lines.push(format!(
                "{}. {} ({}) {} pts",
                idx + 1,
                driver.name,
                driver.team,
                format_points(driver.points)
            )),
        }
    }
    lines
}

fn constructor_lines(constructors: &[ConstructorStanding], format: OutputFormat) -> Vec<String> {
    let mut lines = Vec::with_capacity(constructors.len() + 2);
    if format == OutputFormat::Table {
        lines.push(format!("{:>3}  {:<28} {:>6}", "Pos", "Team", "Pts"));
        lines.push("-".repeat(40));
    }
    for (idx, team) in constructors.iter().enumerate() {
        match format {
            OutputFormat::Table => lines.push(format!(
                "{:>3}  {:<28} {:>6}",
                idx + 1,
                team.name,
                format_points(team.points)
            )),
            _ => lines.push(format!(
                "{}. {} {} pts",
                idx + 1,
                team.name,
                format_points(team.points)
            )),
        }
    }
    lines
}

/// Render final championship standings.
///
/// Driver standings are always shown; constructor standings only when
/// `constructors` is set. Empty or partial runs end with a notice.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_standings(
    standings: &Standings,
    constructors: bool,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(standings);
    }

    let mut lines = vec![format!(
        "{} {} standings after {} of {} round(s)",
        standings.year,
        standings.session.label(),
        standings.processed_rounds.len(),
        standings.eligible_events
    )];
    if !standings.drivers.is_empty() {
        lines.push(String::new());
        lines.push("Drivers".to_string());
        lines.extend(driver_lines(&standings.drivers, format));
    }
    if constructors && !standings.constructors.is_empty() {
        lines.push(String::new());
        lines.push("Constructors".to_string());
        lines.extend(constructor_lines(&standings.constructors, format));
    }
    if let Some(message) = standings.outcome.message() {
        lines.push(String::new());
        lines.push(message);
    }
    Ok(lines.join("\n"))
}

/// One-line progress report for an intermediate snapshot.
#[must_use]
pub fn render_snapshot(snapshot: &StandingsSnapshot) -> String {
    let leader = snapshot.drivers.first().map_or_else(
        || "no points scored".to_string(),
        |leader| format!("leader {} ({} pts)", leader.name, format_points(leader.points)),
    );
    format!(
        "[{}/{}] round {} {}: {leader}",
        snapshot.processed, snapshot.eligible, snapshot.round, snapshot.event_name
    )
}

/// Render lap timing.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_laps(data: &LapData, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(data);
    }

    let mut lines = vec![format!(
        "{} round {} - {} ({} laps)",
        data.year, data.round, data.session_type, data.total_laps
    )];
    if format == OutputFormat::Table {
        lines.push(format!(
            "{:>3}  {:<4} {:>9}  {:>8} {:>8} {:>8}  {:<12} {:>4}",
            "Lap", "Drv", "Time", "S1", "S2", "S3", "Tyre", "Life"
        ));
        lines.push("-".repeat(72));
    }
    for lap in &data.laps {
        let marker = if lap.is_personal_best { " *" } else { "" };
        match format {
            OutputFormat::Table => lines.push(format!(
                "{:>3}  {:<4} {:>9}  {:>8} {:>8} {:>8}  {:<12} {:>4}{marker}",
                position(lap.lap_number),
                lap.driver,
                display_timing(lap.lap_time.as_deref()),
                display_timing(lap.sector1_time.as_deref()),
                display_timing(lap.sector2_time.as_deref()),
                display_timing(lap.sector3_time.as_deref()),
                or_dash(lap.compound.as_deref()),
                position(lap.tyre_life)
            )),
            _ => lines.push(format!(
                "Lap {} {} {}{marker}",
                position(lap.lap_number),
                lap.driver,
                display_timing(lap.lap_time.as_deref())
            )),
        }
    }

    let fastest = data
        .laps
        .iter()
        .filter_map(|lap| lap.lap_duration().map(|duration| (lap, duration)))
        .min_by_key(|(_, duration)| *duration);
    if let Some((lap, duration)) = fastest {
        lines.push(String::new());
        lines.push(format!(
            "Fastest: {} lap {} in {}",
            lap.driver,
            position(lap.lap_number),
            crate::model::format_lap_time(duration)
        ));
    }
    Ok(lines.join("\n"))
}

/// Render telemetry for one lap.
///
/// Plain output is a summary; the table lists every sample.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_telemetry(telemetry: &Telemetry, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(telemetry);
    }

    let mut lines = vec![
        format!(
            "{} round {} - {} driver {} lap {}",
            telemetry.year,
            telemetry.round,
            telemetry.session_type,
            telemetry.driver,
            telemetry.lap_number
        ),
        format!("  Samples:     {}", telemetry.data_points),
        format!(
            "  Top speed:   {}",
            telemetry
                .top_speed()
                .map_or_else(|| "-".to_string(), |speed| format!("{speed} km/h"))
        ),
        format!("  Braking:     {:.1}%", telemetry.braking_ratio() * 100.0),
    ];

    if format == OutputFormat::Table {
        lines.push(String::new());
        lines.push(format!(
            "{:<16} {:>5} {:>6} {:>4} {:>5} {:>5} {:>4}",
            "Time", "Speed", "RPM", "Gear", "Thr", "Brake", "DRS"
        ));
        for sample in &telemetry.telemetry {
            let opt = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
            lines.push(format!(
                "{:<16} {:>5} {:>6} {:>4} {:>5} {:>5} {:>4}",
                display_timing(sample.session_time.as_deref()),
                opt(sample.speed),
                opt(sample.rpm),
                opt(sample.gear.map(u32::from)),
                opt(sample.throttle),
                if sample.brake { "yes" } else { "" },
                opt(sample.drs)
            ));
        }
    }
    Ok(lines.join("\n"))
}

/// Render race control messages.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_race_control(log: &RaceControlLog, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(log);
    }

    let mut lines = vec![format!(
        "{} round {} - {} ({} messages)",
        log.year, log.round, log.session_type, log.total_messages
    )];
    for message in &log.messages {
        let time = or_dash(message.time.as_deref());
        let text = or_dash(message.message.as_deref());
        match format {
            OutputFormat::Table => lines.push(format!(
                "{time:<20} {:<12} {:<10} {text}",
                or_dash(message.category.as_deref()),
                or_dash(message.flag.as_deref())
            )),
            _ => {
                let flag = if message.is_flag() {
                    format!(" [{}]", or_dash(message.flag.as_deref()))
                } else {
                    String::new()
                };
                lines.push(format!("{time}{flag} {text}"));
            }
        }
    }
    Ok(lines.join("\n"))
}

/// Render a list of drivers under a heading.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_drivers(heading: &str, drivers: &[DriverEntry], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(drivers);
    }

    let mut lines = vec![format!("{heading} ({} drivers)", drivers.len())];
    if format == OutputFormat::Table {
        lines.push(format!("{:>3}  {:<4} {:<24} {}", "No", "Code", "Driver", "Team"));
        lines.push("-".repeat(60));
    }
    for driver in drivers {
        match format {
            OutputFormat::Table => lines.push(format!(
                "{:>3}  {:<4} {:<24} {}",
                driver.number, driver.abbreviation, driver.full_name, driver.team_name
            )),
            _ => lines.push(format!(
                "#{} {} ({})",
                driver.number, driver.full_name, driver.team_name
            )),
        }
    }
    Ok(lines.join("\n"))
}

/// Render circuit details.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_circuit(details: &CircuitDetails, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(details);
    }

    let info = &details.event_info;
    let mut lines = vec![
        format!("{} {}", details.year, info.event_name),
        format!("  Location:    {}, {}", info.location, info.country),
        format!(
            "  Lap length:  {}",
            details
                .lap_length_km
                .map_or_else(|| "-".to_string(), |km| format!("{km:.3} km"))
        ),
        format!("  Corners:     {}", details.circuit_info.corners.len()),
    ];
    if let Some(official) = &info.official_name {
        lines.insert(1, format!("  {official}"));
    }

    if format == OutputFormat::Table {
        lines.push(String::new());
        lines.push(format!("{:<6} {:>10} {:>8}", "Turn", "Distance", "Angle"));
        for corner in &details.circuit_info.corners {
            lines.push(format!(
                "{:<6} {:>10} {:>8}",
                corner.label().unwrap_or_else(|| "-".to_string()),
                corner
                    .distance()
                    .map_or_else(|| "-".to_string(), |d| format!("{d:.0} m")),
                corner
                    .angle()
                    .map_or_else(|| "-".to_string(), |a| format!("{a:.0}")),
            ));
        }
    }
    Ok(lines.join("\n"))
}

/// Render the API health check.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_health(base_url: &str, health: &Health, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&json!({
            "api_url": base_url,
            "status": health.status,
            "message": health.message,
        }));
    }
    Ok(format!(
        "API:     {base_url}\nStatus:  {}\nMessage: {}",
        health.status, health.message
    ))
}
