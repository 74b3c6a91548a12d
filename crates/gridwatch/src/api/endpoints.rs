//! URL construction for the F1 data API.

use crate::model::SessionType;

/// Builds request URLs relative to an API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Create endpoints for the given base URL (scheme and host, optionally a path prefix).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: format!("{}/api", base_url.trim().trim_end_matches('/')),
        }
    }

    /// `GET /api/health`
    #[must_use]
    pub fn health(&self) -> String {
        format!("{}/health", self.base)
    }

    /// `GET /api/schedule/{year}`
    #[must_use]
    pub fn schedule(&self, year: i32) -> String {
        format!("{}/schedule/{year}", self.base)
    }

    /// `GET /api/session/{year}/{round}/{session}`
    #[must_use]
    pub fn session_results(&self, year: i32, round: u32, session: SessionType) -> String {
        format!("{}/session/{year}/{round}/{session}", self.base)
    }

    /// `GET /api/drivers/{year}/{round}/{session}`
    #[must_use]
    pub fn session_drivers(&self, year: i32, round: u32, session: SessionType) -> String {
        format!("{}/drivers/{year}/{round}/{session}", self.base)
    }

    /// `GET /api/drivers/{year}`
    #[must_use]
    pub fn roster(&self, year: i32) -> String {
        format!("{}/drivers/{year}", self.base)
    }

    /// `GET /api/laps/{year}/{round}/{session}`; the driver filter goes in the query string.
    #[must_use]
    pub fn laps(&self, year: i32, round: u32, session: SessionType) -> String {
        format!("{}/laps/{year}/{round}/{session}", self.base)
    }

    /// `GET /api/telemetry/{year}/{round}/{session}/{driver}/{lap}`
    #[must_use]
    pub fn telemetry(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
        driver: &str,
        lap: u32,
    ) -> String {
        format!(
            "{}/telemetry/{year}/{round}/{session}/{}/{lap}",
            self.base,
            driver.trim()
        )
    }

    /// `GET /api/race-control/{year}/{round}/{session}`
    #[must_use]
    pub fn race_control(&self, year: i32, round: u32, session: SessionType) -> String {
        format!("{}/race-control/{year}/{round}/{session}", self.base)
    }

    /// `GET /api/circuit/{year}/{round}`
    #[must_use]
    pub fn circuit(&self, year: i32, round: u32) -> String {
        format!("{}/circuit/{year}/{round}", self.base)
    }
}
