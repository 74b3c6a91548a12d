//! `gridwatch` - CLI for the F1 season dashboard
//!
//! This binary provides the command-line interface over the gridwatch
//! library: calendar, results, standings, and timing views.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use gridwatch::cli::{
    CircuitCommand, Cli, Command, ConfigCommand, DashboardCommand, DriversCommand, LapsCommand,
    RaceControlCommand, ResultsCommand, ScheduleCommand, StandingsCommand,
    TelemetryCommand,
};
use gridwatch::model::SessionType;
use gridwatch::standings::eligible_events;
use gridwatch::{
    classify, init_logging, render, Aggregator, ApiClient, Config, StandingsSupervisor,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
        config.validate().context("invalid --api-url")?;
    }

    let client = ApiClient::new(&config)?;
    debug!(api = config.base_url(), "created API client");

    // Execute the command
    run(&client, &config, cli.command).await
}

async fn run(client: &ApiClient, config: &Config, command: Command) -> Result<()> {
    let output = match command {
        Command::Dashboard(cmd) => handle_dashboard(client, config, &cmd).await?,
        Command::Schedule(cmd) => handle_schedule(client, config, &cmd).await?,
        Command::Results(cmd) => handle_results(client, config, &cmd).await?,
        Command::Standings(cmd) => handle_standings(client, config, &cmd).await?,
        Command::Laps(cmd) => handle_laps(client, config, &cmd).await?,
        Command::Telemetry(cmd) => handle_telemetry(client, config, &cmd).await?,
        Command::RaceControl(cmd) => handle_race_control(client, config, &cmd).await?,
        Command::Drivers(cmd) => handle_drivers(client, config, &cmd).await?,
        Command::Circuit(cmd) => handle_circuit(client, config, &cmd).await?,
        Command::Health(cmd) => {
            let health = client.health().await.context("API health check failed")?;
            if !health.is_healthy() {
                warn!(status = %health.status, "API reports unhealthy");
            }
            render::render_health(config.base_url(), &health, cmd.format)?
        }
        Command::Config(config_cmd) => return handle_config(config, config_cmd),
    };
    println!("{output}");
    Ok(())
}

async fn handle_dashboard(
    client: &ApiClient,
    config: &Config,
    cmd: &DashboardCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let now = Utc::now();
    let schedule = client
        .fetch_schedule(year)
        .await
        .with_context(|| format!("failed to load the {year} schedule"))?;

    let limit = cmd.upcoming.unwrap_or(config.dashboard.upcoming_limit);
    let view = classify::dashboard(&schedule.events, now, limit);

    // The previous race's podium is a bonus; the dashboard renders without it.
    let previous_round = match &view.featured {
        Some(featured) => featured.event.round().checked_sub(1).filter(|round| *round > 0),
        None => eligible_events(&schedule.events, now)
            .last()
            .map(|event| event.round()),
    };
    let previous = match previous_round {
        Some(round) => client
            .fetch_session_results(year, round, SessionType::Race)
            .await
            .inspect_err(|err| {
                warn!(round, error = %err, "previous results unavailable");
            })
            .ok(),
        None => None,
    };

    Ok(render::render_dashboard(
        year,
        &view,
        previous.as_ref(),
        cmd.format,
    )?)
}

async fn handle_schedule(
    client: &ApiClient,
    config: &Config,
    cmd: &ScheduleCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let schedule = client
        .fetch_schedule(year)
        .await
        .with_context(|| format!("failed to load the {year} schedule"))?;
    Ok(render::render_schedule(&schedule, Utc::now(), cmd.format)?)
}

async fn handle_results(
    client: &ApiClient,
    config: &Config,
    cmd: &ResultsCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let results = client
        .fetch_session_results(year, cmd.round, cmd.session.into())
        .await?;
    Ok(render::render_results(&results, cmd.format)?)
}

async fn handle_standings(
    client: &ApiClient,
    config: &Config,
    cmd: &StandingsCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let session = cmd
        .session
        .map_or_else(|| config.standings_session(), SessionType::from);

    let mut supervisor = StandingsSupervisor::new();
    let token = supervisor.begin_run();

    let interrupt = token.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling the standings run");
            interrupt.cancel();
        }
    });

    let (tx, mut rx) = mpsc::channel(8);
    let mut aggregator = Aggregator::new(client)
        .with_session(session)
        .with_fetch_timeout(config.fetch_timeout())
        .with_cancel_token(token);
    if cmd.progress {
        aggregator = aggregator.with_progress(tx);
    } else {
        drop(tx);
    }

    let run = async move {
        let result = aggregator.aggregate_season(year, Utc::now()).await;
        drop(aggregator);
        result
    };
    let report = async {
        while let Some(snapshot) = rx.recv().await {
            eprintln!("{}", render::render_snapshot(&snapshot));
        }
    };
    let (result, ()) = tokio::join!(run, report);
    ctrl_c.abort();

    // A cancelled run discards the rounds it had already summed.
    let standings = match result {
        Err(err) if err.is_cancelled() => {
            anyhow::bail!("{year} standings run interrupted; no standings were produced")
        }
        other => other.with_context(|| format!("failed to build {year} standings"))?,
    };
    Ok(render::render_standings(
        &standings,
        cmd.constructors,
        cmd.format,
    )?)
}

async fn handle_laps(client: &ApiClient, config: &Config, cmd: &LapsCommand) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let laps = client
        .laps(year, cmd.round, cmd.session.into(), cmd.driver.as_deref())
        .await?;
    Ok(render::render_laps(&laps, cmd.format)?)
}

async fn handle_telemetry(
    client: &ApiClient,
    config: &Config,
    cmd: &TelemetryCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let telemetry = client
        .telemetry(year, cmd.round, cmd.session.into(), &cmd.driver, cmd.lap)
        .await?;
    Ok(render::render_telemetry(&telemetry, cmd.format)?)
}

async fn handle_race_control(
    client: &ApiClient,
    config: &Config,
    cmd: &RaceControlCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let log = client
        .race_control(year, cmd.round, cmd.session.into())
        .await?;
    Ok(render::render_race_control(&log, cmd.format)?)
}

async fn handle_drivers(
    client: &ApiClient,
    config: &Config,
    cmd: &DriversCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    if let Some(round) = cmd.round {
        let session: SessionType = cmd.session.into();
        let entry = client.session_drivers(year, round, session).await?;
        let heading = format!("{year} round {round} - {session}");
        Ok(render::render_drivers(&heading, &entry.drivers, cmd.format)?)
    } else {
        let roster = client.roster(year).await?;
        Ok(render::render_drivers(
            &format!("{year} drivers"),
            &roster.drivers,
            cmd.format,
        )?)
    }
}

async fn handle_circuit(
    client: &ApiClient,
    config: &Config,
    cmd: &CircuitCommand,
) -> Result<String> {
    let year = cmd.year.unwrap_or_else(|| config.season());
    let details = client.circuit(year, cmd.round).await?;
    Ok(render::render_circuit(&details, cmd.format)?)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.base_url());
                println!("  Request timeout:    {}s", config.api.request_timeout_secs);
                println!("  User agent:         {}", config.api.user_agent);
                println!();
                println!("[Standings]");
                println!("  Fetch timeout:      {}s", config.standings.fetch_timeout_secs);
                println!("  Session:            {}", config.standings_session().label());
                println!();
                println!("[Dashboard]");
                println!("  Upcoming events:    {}", config.dashboard.upcoming_limit);
                println!("  Season:             {}", config.season());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
