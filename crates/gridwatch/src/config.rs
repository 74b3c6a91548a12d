//! Configuration management for gridwatch.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Utc};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::SessionType;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "gridwatch";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "GRIDWATCH_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GRIDWATCH_`, sections split on `__`)
/// 2. TOML config file at `~/.config/gridwatch/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Standings aggregation settings.
    pub standings: StandingsConfig,
    /// Dashboard display settings.
    pub dashboard: DashboardConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the F1 data API, without the `/api` suffix.
    pub base_url: String,
    /// Timeout applied to every HTTP request, in seconds.
    pub request_timeout_secs: u64,
    /// User agent sent with requests.
    pub user_agent: String,
}

/// Standings aggregation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsConfig {
    /// Timeout for each per-round results fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Session whose points are summed ("R" for grands prix, "S" for sprints).
    pub session: String,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of upcoming events listed after the featured one.
    pub upcoming_limit: usize,
    /// Season to show. Defaults to the current year.
    pub season: Option<i32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 30,
            user_agent: format!("gridwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            session: SessionType::Race.code().to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: 3,
            season: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(Error::ConfigValidation {
                message: "api.base_url must not be empty".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("api.base_url must start with http:// or https:// (got {base_url})"),
            });
        }

        if self.api.request_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "api.request_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.standings.fetch_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "standings.fetch_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.standings.session.parse::<SessionType>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("standings.session is not a session code: {}", self.standings.session),
            });
        }

        if self.dashboard.upcoming_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "dashboard.upcoming_limit must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim().trim_end_matches('/')
    }

    /// Get the HTTP request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Get the per-round standings fetch timeout as a Duration.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.standings.fetch_timeout_secs)
    }

    /// Get the session summed into standings.
    ///
    /// Falls back to the race when the configured code is invalid; `validate`
    /// rejects such configurations up front.
    #[must_use]
    pub fn standings_session(&self) -> SessionType {
        self.standings.session.parse().unwrap_or_default()
    }

    /// Get the season to display, resolving the current year if unset.
    #[must_use]
    pub fn season(&self) -> i32 {
        self.dashboard.season.unwrap_or_else(|| Utc::now().year())
    }
}
