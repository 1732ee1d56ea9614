//! Connection and polling settings for talking to an H2O cluster.

use crate::core::constants::*;
use crate::core::error::{H2oAutoMLError, Result};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How often and how patiently job status is polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay before the second status request, in milliseconds
    pub initial_interval_ms: u64,
    /// Upper bound on the delay, in milliseconds
    pub max_interval_ms: u64,
    /// Delay growth factor after each non-terminal status
    pub backoff_factor: f64,
    /// Random jitter added to each delay, as a fraction of it
    pub jitter: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            initial_interval_ms: DEFAULT_POLL_INITIAL_INTERVAL_MS,
            max_interval_ms: DEFAULT_POLL_MAX_INTERVAL_MS,
            backoff_factor: DEFAULT_POLL_BACKOFF_FACTOR,
            jitter: DEFAULT_POLL_JITTER,
        }
    }
}

impl PollConfig {
    /// Fixed interval with no backoff or jitter; handy for tests.
    pub fn fixed(interval: Duration) -> Self {
        let ms = interval.as_millis() as u64;
        PollConfig {
            initial_interval_ms: ms,
            max_interval_ms: ms,
            backoff_factor: 1.0,
            jitter: 0.0,
        }
    }

    /// Validate the polling parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(H2oAutoMLError::invalid_parameter(
                "poll.max_interval_ms",
                self.max_interval_ms.to_string(),
                format!("must be <= {}", MAX_POLL_INTERVAL_MS),
            ));
        }
        if self.max_interval_ms < self.initial_interval_ms {
            return Err(H2oAutoMLError::invalid_parameter(
                "poll.max_interval_ms",
                self.max_interval_ms.to_string(),
                format!("must be >= initial_interval_ms ({})", self.initial_interval_ms),
            ));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(H2oAutoMLError::invalid_parameter(
                "poll.backoff_factor",
                self.backoff_factor.to_string(),
                "must be a finite number >= 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(H2oAutoMLError::invalid_parameter(
                "poll.jitter",
                self.jitter.to_string(),
                "must be in range [0.0, 1.0]",
            ));
        }
        Ok(())
    }

    /// Delay to use after `previous`, before jitter.
    pub fn next_interval(&self, previous: Duration) -> Duration {
        let next = previous.as_millis() as f64 * self.backoff_factor;
        let capped = next.min(self.max_interval_ms as f64).max(self.initial_interval_ms as f64);
        Duration::from_millis(capped as u64)
    }

    /// First delay.
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }
}

/// Address, credentials and timeouts of the H2O cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL, e.g. `http://localhost:54321`
    pub url: String,
    /// Basic-auth user name
    pub username: Option<String>,
    /// Basic-auth password
    pub password: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Job polling cadence
    pub poll: PollConfig,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            url: DEFAULT_H2O_URL.to_string(),
            username: None,
            password: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll: PollConfig::default(),
        }
    }
}

impl ConnectionConfig {
    /// Default connection to a local cluster
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cluster URL
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    /// Set basic-auth credentials
    pub fn with_credentials<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the polling cadence
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the connection parameters
    pub fn validate(&self) -> Result<()> {
        let parsed = reqwest::Url::parse(&self.url).map_err(|e| {
            H2oAutoMLError::invalid_parameter("url", self.url.clone(), e.to_string())
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(H2oAutoMLError::invalid_parameter(
                    "url",
                    self.url.clone(),
                    format!("unsupported scheme '{}', use http or https", scheme),
                ))
            }
        }
        if self.timeout_secs == 0 {
            return Err(H2oAutoMLError::invalid_parameter(
                "timeout_secs",
                "0",
                "must be at least 1",
            ));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(H2oAutoMLError::config(
                "username and password must be given together",
            ));
        }
        self.poll.validate()
    }

    /// Load a connection configuration from a `.toml` or `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| H2oAutoMLError::config(format!("Failed to read config file: {}", e)))?;

        let config: ConnectionConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                H2oAutoMLError::config(format!("Failed to parse JSON config: {}", e))
            })?,
            Some("toml") => toml::from_str(&content).map_err(|e| {
                H2oAutoMLError::config(format!("Failed to parse TOML config: {}", e))
            })?,
            _ => {
                return Err(H2oAutoMLError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a connection configuration from `H2O_*` environment variables.
    ///
    /// Recognized: `H2O_URL`, `H2O_USERNAME`, `H2O_PASSWORD`,
    /// `H2O_TIMEOUT_SECS`, `H2O_POLL_INTERVAL_MS`.
    pub fn load_from_environment() -> Result<Self> {
        let mut config = ConnectionConfig::default();
        config.apply_environment_overrides()?;
        Ok(config)
    }

    /// Apply `H2O_*` environment variables on top of this configuration.
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("H2O_URL") {
            self.url = val;
        }
        if let Some(val) = lookup("H2O_USERNAME") {
            self.username = Some(val);
        }
        if let Some(val) = lookup("H2O_PASSWORD") {
            self.password = Some(val);
        }
        if let Some(val) = lookup("H2O_TIMEOUT_SECS") {
            self.timeout_secs = val
                .parse()
                .map_err(|_| crate::config_error!("Invalid H2O_TIMEOUT_SECS value '{}'", val))?;
        }
        if let Some(val) = lookup("H2O_POLL_INTERVAL_MS") {
            let ms: u64 = val
                .parse()
                .map_err(|_| crate::config_error!("Invalid H2O_POLL_INTERVAL_MS value '{}'", val))?;
            self.poll.initial_interval_ms = ms;
            if self.poll.max_interval_ms < ms {
                self.poll.max_interval_ms = ms;
            }
        }

        self.validate()
    }
}
