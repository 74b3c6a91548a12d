//! Command-line interface for gridwatch.
//!
//! This module provides the CLI structure for the `gridwatch` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CircuitCommand, ConfigCommand, DashboardCommand, DriversCommand, HealthCommand, LapsCommand,
    OutputFormat, RaceControlCommand, ResultsCommand, ScheduleCommand, SessionArg,
    StandingsCommand, TelemetryCommand,
};

/// gridwatch - Formula 1 season dashboard
///
/// Shows the race calendar with countdowns, session results, live-built
/// championship standings, and timing data from an F1 data API.
#[derive(Debug, Parser)]
#[command(name = "gridwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current or next race and what follows
    Dashboard(DashboardCommand),

    /// List a season's events with their status
    Schedule(ScheduleCommand),

    /// Show the classification of a session
    Results(ResultsCommand),

    /// Build championship standings from completed rounds
    Standings(StandingsCommand),

    /// Show lap timing for a session
    Laps(LapsCommand),

    /// Show car telemetry for one lap
    Telemetry(TelemetryCommand),

    /// Show race control messages for a session
    RaceControl(RaceControlCommand),

    /// List drivers for a season or a session
    Drivers(DriversCommand),

    /// Show circuit information for a round
    Circuit(CircuitCommand),

    /// Check that the API is reachable
    Health(HealthCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
