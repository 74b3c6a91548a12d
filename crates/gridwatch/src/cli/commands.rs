//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::SessionType;

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Season to show (defaults to the configured or current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Number of upcoming events to list after the featured one
    #[arg(short = 'n', long)]
    pub upcoming: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Schedule command arguments.
#[derive(Debug, Args)]
pub struct ScheduleCommand {
    /// Season to list
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Session results command arguments.
#[derive(Debug, Args)]
pub struct ResultsCommand {
    /// Round number
    pub round: u32,

    /// Session to show
    #[arg(short, long, value_enum, ignore_case = true, default_value = "R")]
    pub session: SessionArg,

    /// Season
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Standings command arguments.
#[derive(Debug, Args)]
pub struct StandingsCommand {
    /// Season to aggregate
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Session whose points are summed (defaults to the configured session)
    #[arg(short, long, value_enum, ignore_case = true)]
    pub session: Option<SessionArg>,

    /// Also show constructor standings
    #[arg(short = 'C', long)]
    pub constructors: bool,

    /// Print intermediate standings after each round
    #[arg(short, long)]
    pub progress: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Lap timing command arguments.
#[derive(Debug, Args)]
pub struct LapsCommand {
    /// Round number
    pub round: u32,

    /// Session
    #[arg(short, long, value_enum, ignore_case = true, default_value = "R")]
    pub session: SessionArg,

    /// Only laps of this driver (number or code)
    #[arg(short, long)]
    pub driver: Option<String>,

    /// Season
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Telemetry command arguments.
#[derive(Debug, Args)]
pub struct TelemetryCommand {
    /// Round number
    pub round: u32,

    /// Driver number or code
    pub driver: String,

    /// Lap number
    pub lap: u32,

    /// Session
    #[arg(short, long, value_enum, ignore_case = true, default_value = "R")]
    pub session: SessionArg,

    /// Season
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Race control command arguments.
#[derive(Debug, Args)]
pub struct RaceControlCommand {
    /// Round number
    pub round: u32,

    /// Session
    #[arg(short, long, value_enum, ignore_case = true, default_value = "R")]
    pub session: SessionArg,

    /// Season
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Driver list command arguments.
#[derive(Debug, Args)]
pub struct DriversCommand {
    /// Season
    #[arg(short, long)]
    pub year: Option<i32>,

    /// List the drivers of one round instead of the season roster
    #[arg(short, long)]
    pub round: Option<u32>,

    /// Session, used with --round
    #[arg(short, long, value_enum, ignore_case = true, default_value = "R")]
    pub session: SessionArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Circuit command arguments.
#[derive(Debug, Args)]
pub struct CircuitCommand {
    /// Round number
    pub round: u32,

    /// Season
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Health command arguments.
#[derive(Debug, Args)]
pub struct HealthCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Session argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionArg {
    /// Race
    #[value(name = "R")]
    Race,
    /// Qualifying
    #[value(name = "Q")]
    Qualifying,
    /// Sprint
    #[value(name = "S")]
    Sprint,
    /// First practice
    #[value(name = "FP1")]
    Practice1,
    /// Second practice
    #[value(name = "FP2")]
    Practice2,
    /// Third practice
    #[value(name = "FP3")]
    Practice3,
}

impl From<SessionArg> for SessionType {
    fn from(arg: SessionArg) -> Self {
        match arg {
            SessionArg::Race => Self::Race,
            SessionArg::Qualifying => Self::Qualifying,
            SessionArg::Sprint => Self::Sprint,
            SessionArg::Practice1 => Self::Practice1,
            SessionArg::Practice2 => Self::Practice2,
            SessionArg::Practice3 => Self::Practice3,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
