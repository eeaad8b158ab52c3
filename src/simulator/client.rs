use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::config::SimulatorSettings;
use crate::simulator::config::SimulationConfig;
use crate::simulator::error::SimulatorError;
use crate::simulator::orbit::orbit_positions;
use crate::simulator::record::SimulationRecord;
use crate::simulator::result::SimulationResult;

const SESSION_COOKIE: &str = "session=";

/// Session token issued by the service for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Read the token out of a `set-cookie` header value.
    pub fn from_cookie(header: &str) -> Option<Self> {
        let token = header
            .split(';')
            .find_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE))?
            .trim();
        (!token.is_empty()).then(|| Self::new(token))
    }

    fn cookie(&self) -> String {
        format!("{}{}", SESSION_COOKIE, self.0)
    }
}

#[derive(Debug, Deserialize)]
struct Progress {
    now: Value,
}

impl Progress {
    fn percent(&self) -> Option<f64> {
        match &self.now {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Client for the remote ADCS simulation service.
#[derive(Debug, Clone)]
pub struct SimulatorClient {
    base_url: String,
    client: reqwest::Client,
    poll_interval: Duration,
    settle_delay: Duration,
    timeout: Duration,
}

impl SimulatorClient {
    pub fn new(settings: &SimulatorSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            poll_interval: settings.poll_interval,
            settle_delay: settings.settle_delay,
            timeout: settings.timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SimulatorError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SimulatorError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Submit a configuration and start a simulation.
    pub async fn create_session(&self, config: &SimulationConfig) -> Result<SessionHandle, SimulatorError> {
        let response = self
            .client
            .post(self.url("platform-configuration"))
            .json(config)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let session = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(SessionHandle::from_cookie)
            .ok_or(SimulatorError::MissingSession)?;
        log::info!("Started simulation '{}' as session {}", config.name, session.token());
        Ok(session)
    }

    /// Completion percentage, 0 to 100.
    pub async fn progress(&self, session: &SessionHandle) -> Result<f64, SimulatorError> {
        let response = self
            .client
            .get(self.url("updateP"))
            .header(reqwest::header::COOKIE, session.cookie())
            .send()
            .await?;
        let progress: Progress = Self::check(response).await?.json().await?;
        progress
            .percent()
            .ok_or_else(|| SimulatorError::Malformed(format!("progress value {}", progress.now)))
    }

    /// Poll until the run reports 100%, then give the service time to
    /// publish results.
    pub async fn wait_until_done(&self, session: &SessionHandle) -> Result<(), SimulatorError> {
        let poll = async {
            loop {
                match self.progress(session).await {
                    Ok(p) if p >= 100.0 => break,
                    Ok(p) => log::info!("Simulation progress: {:.0}%", p),
                    // Progress polling is best effort; the service drops some requests mid-run.
                    Err(e) => log::warn!("Progress request failed: {}", e),
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };
        tokio::time::timeout(self.timeout, poll)
            .await
            .map_err(|_| SimulatorError::Timeout(self.timeout))?;
        log::info!("Simulation finished, waiting {:?} for results", self.settle_delay);
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    pub async fn fetch_result(&self, session: &SessionHandle) -> Result<SimulationResult, SimulatorError> {
        let response = self
            .client
            .get(self.url("result"))
            .header(reqwest::header::COOKIE, session.cookie())
            .send()
            .await?;
        let text = Self::check(response).await?.text().await?;
        SimulationResult::from_page(&text)
    }

    /// Full run: start, wait, fetch, then propagate the orbit at every
    /// result timestamp.
    pub async fn run(&self, config: SimulationConfig) -> Result<SimulationRecord, SimulatorError> {
        let session = self.create_session(&config).await?;
        self.wait_until_done(&session).await?;
        self.resume(config, &session).await
    }

    /// Fetch the results of an existing session.
    pub async fn resume(
        &self,
        config: SimulationConfig,
        session: &SessionHandle,
    ) -> Result<SimulationRecord, SimulatorError> {
        let result = self.fetch_result(session).await?;
        let timestamps = result.timestamps()?;
        let positions = orbit_positions(config.tle(), &timestamps)?;
        log::info!("Fetched {} samples", timestamps.len());
        SimulationRecord::new(config, result, timestamps, positions)
    }
}
