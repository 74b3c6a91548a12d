//! HTTP client for the F1 data API.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use super::endpoints::Endpoints;
use super::SeasonSource;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    CircuitDetails, Event, Health, LapData, RaceControlLog, ResultRow, Roster, Schedule,
    SessionDrivers, SessionResults, SessionType, Telemetry,
};

/// Error body the API returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Async client for every operation the F1 data API offers.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Endpoints,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            endpoints: Endpoints::new(config.base_url()),
        })
    }

    /// The URL builder used by this client.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, resource, "API response");

        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(resource));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|body| body.error)
                .unwrap_or(body);
            return Err(Error::api(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        trace!(len = bytes.len(), resource, "decoding response body");
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: String, resource: &str) -> Result<T> {
        debug!(%url, "GET");
        self.get_json(self.http.get(url), resource).await
    }

    /// Check API connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API cannot be reached or answers with an error.
    pub async fn health(&self) -> Result<Health> {
        self.get(self.endpoints.health(), "health").await
    }

    /// Fetch a season schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn fetch_schedule(&self, year: i32) -> Result<Schedule> {
        self.get(self.endpoints.schedule(year), &format!("schedule for {year}"))
            .await
    }

    /// Fetch the classification of one session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn fetch_session_results(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
    ) -> Result<SessionResults> {
        self.get(
            self.endpoints.session_results(year, round, session),
            &format!("{session} results for {year} round {round}"),
        )
        .await
    }

    /// Fetch the drivers entered in one session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn session_drivers(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
    ) -> Result<SessionDrivers> {
        self.get(
            self.endpoints.session_drivers(year, round, session),
            &format!("{session} drivers for {year} round {round}"),
        )
        .await
    }

    /// Fetch the season's driver line-up.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn roster(&self, year: i32) -> Result<Roster> {
        self.get(self.endpoints.roster(year), &format!("drivers for {year}"))
            .await
    }

    /// Fetch lap timing, optionally for a single driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn laps(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
        driver: Option<&str>,
    ) -> Result<LapData> {
        let url = self.endpoints.laps(year, round, session);
        debug!(%url, ?driver, "GET");
        let mut request = self.http.get(url);
        if let Some(driver) = driver {
            request = request.query(&[("driver", driver.trim())]);
        }
        self.get_json(request, &format!("{session} laps for {year} round {round}"))
            .await
    }

    /// Fetch car telemetry for one lap of one driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn telemetry(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
        driver: &str,
        lap: u32,
    ) -> Result<Telemetry> {
        self.get(
            self.endpoints.telemetry(year, round, session, driver, lap),
            &format!("telemetry for driver {driver} lap {lap}"),
        )
        .await
    }

    /// Fetch race control messages for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn race_control(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
    ) -> Result<RaceControlLog> {
        self.get(
            self.endpoints.race_control(year, round, session),
            &format!("{session} race control for {year} round {round}"),
        )
        .await
    }

    /// Fetch circuit information for a round.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn circuit(&self, year: i32, round: u32) -> Result<CircuitDetails> {
        self.get(
            self.endpoints.circuit(year, round),
            &format!("circuit for {year} round {round}"),
        )
        .await
    }
}

#[async_trait::async_trait]
impl SeasonSource for ApiClient {
    async fn schedule(&self, year: i32) -> Result<Vec<Event>> {
        Ok(self.fetch_schedule(year).await?.events)
    }

    async fn session_results(
        &self,
        year: i32,
        round: u32,
        session: SessionType,
    ) -> Result<Vec<ResultRow>> {
        Ok(self
            .fetch_session_results(year, round, session)
            .await?
            .results)
    }
}
