//! Remote job handles and the status poll loop.
//!
//! Every long-running server operation (AutoML builds, predictions) returns a
//! job. [`JobHandle::wait`] polls it with exponential backoff until it reaches
//! a terminal state. The wait is an ordinary future: dropping it stops local
//! polling, and [`JobHandle::cancel`] stops the remote work.

use crate::client::schema::JobV3;
use crate::client::H2oClient;
use crate::config::PollConfig;
use crate::core::error::{H2oAutoMLError, Result};
use crate::core::types::JobState;

use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

/// Snapshot of a remote job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    /// Current state
    pub state: JobState,
    /// Completion fraction in `[0, 1]`
    pub progress: f64,
    /// Server progress message
    pub progress_msg: Option<String>,
    /// Runtime so far in milliseconds
    pub msec: u64,
    /// When the server started the job
    pub started_at: Option<DateTime<Utc>>,
    /// Failure message, for failed jobs
    pub exception: Option<String>,
    /// Non-fatal warnings
    pub warnings: Vec<String>,
}

impl From<JobV3> for JobStatus {
    fn from(job: JobV3) -> Self {
        JobStatus {
            state: job.status,
            progress: job.progress,
            progress_msg: job.progress_msg,
            msec: job.msec,
            started_at: job.start_time.and_then(DateTime::<Utc>::from_timestamp_millis),
            exception: job.exception,
            warnings: job.warnings.unwrap_or_default(),
        }
    }
}

impl JobStatus {
    /// Whether the job can no longer change state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Handle to a job running on the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    job_key: String,
    dest_key: String,
    description: String,
}

impl JobHandle {
    /// Build a handle from a job description.
    pub fn from_job(job: JobV3, description: &str) -> Result<Self> {
        let dest = job.dest.ok_or_else(|| {
            H2oAutoMLError::unexpected_response(
                format!("job {}", job.key.name),
                "job has no destination key",
            )
        })?;
        Ok(JobHandle::new(job.key.name, dest.name, description))
    }

    /// Build a handle from known keys.
    pub fn new<J: Into<String>, D: Into<String>>(job_key: J, dest_key: D, description: &str) -> Self {
        JobHandle {
            job_key: job_key.into(),
            dest_key: dest_key.into(),
            description: description.to_string(),
        }
    }

    /// Job key
    pub fn job_key(&self) -> &str {
        &self.job_key
    }

    /// Key of the object the job produces
    pub fn dest_key(&self) -> &str {
        &self.dest_key
    }

    /// What the job does, for log messages
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fetch one status snapshot.
    pub async fn status(&self, client: &H2oClient) -> Result<JobStatus> {
        Ok(client.job(&self.job_key).await?.into())
    }

    /// Ask the cluster to stop this job.
    pub async fn cancel(&self, client: &H2oClient) -> Result<()> {
        log::info!("Cancelling {} job {}", self.description, self.job_key);
        client.cancel_job(&self.job_key).await
    }

    /// Poll until the job is terminal, using the client's poll cadence.
    ///
    /// Returns the final status for `DONE`, [`H2oAutoMLError::JobFailed`] for
    /// `FAILED` and [`H2oAutoMLError::JobCancelled`] for `CANCELLED`.
    pub async fn wait(&self, client: &H2oClient) -> Result<JobStatus> {
        self.wait_with(client, client.poll_config()).await
    }

    /// [`wait`](JobHandle::wait) with an explicit poll cadence.
    pub async fn wait_with(&self, client: &H2oClient, poll: &PollConfig) -> Result<JobStatus> {
        poll.validate()?;
        let mut interval = poll.initial_interval();
        let mut last_progress = -1.0;

        loop {
            let status = self.status(client).await?;
            match status.state {
                JobState::Done => {
                    log::info!(
                        "{} job {} finished in {:.1}s",
                        self.description,
                        self.job_key,
                        status.msec as f64 / 1000.0
                    );
                    for warning in &status.warnings {
                        log::warn!("{} job {}: {}", self.description, self.job_key, warning);
                    }
                    return Ok(status);
                }
                JobState::Failed => {
                    let message = status
                        .exception
                        .clone()
                        .unwrap_or_else(|| "job failed without a message".to_string());
                    log::warn!("{} job {} failed: {}", self.description, self.job_key, message);
                    return Err(H2oAutoMLError::JobFailed {
                        job_key: self.job_key.clone(),
                        message,
                    });
                }
                JobState::Cancelled => {
                    return Err(H2oAutoMLError::JobCancelled {
                        job_key: self.job_key.clone(),
                    });
                }
                JobState::Created | JobState::Running => {
                    if status.progress != last_progress {
                        log::debug!(
                            "{} job {}: {:.0}%{}",
                            self.description,
                            self.job_key,
                            status.progress * 100.0,
                            status
                                .progress_msg
                                .as_deref()
                                .map(|m| format!(" ({})", m))
                                .unwrap_or_default()
                        );
                        last_progress = status.progress;
                    }
                }
            }

            tokio::time::sleep(with_jitter(interval, poll.jitter)).await;
            interval = poll.next_interval(interval);
        }
    }
}

fn with_jitter(interval: Duration, jitter: f64) -> Duration {
    if jitter <= 0.0 {
        return interval;
    }
    let factor = 1.0 + rand::thread_rng().gen_range(0.0..jitter);
    Duration::try_from_secs_f64(interval.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::schema::KeyV3;
    use crate::core::constants::MAX_POLL_INTERVAL_MS;

    fn job(status: JobState) -> JobV3 {
        JobV3 {
            key: KeyV3 { name: "job_1".to_string() },
            dest: Some(KeyV3 { name: "automl_F".to_string() }),
            status,
            progress: 1.0,
            progress_msg: None,
            start_time: Some(1_500_000_000_000),
            msec: 2500,
            description: None,
            exception: None,
            stacktrace: None,
            warnings: Some(vec!["slow".to_string()]),
        }
    }

    #[test]
    fn test_handle_from_job() {
        let handle = JobHandle::from_job(job(JobState::Running), "AutoML").unwrap();
        assert_eq!(handle.job_key(), "job_1");
        assert_eq!(handle.dest_key(), "automl_F");
        assert_eq!(handle.description(), "AutoML");
    }

    #[test]
    fn test_handle_requires_destination() {
        let mut without_dest = job(JobState::Running);
        without_dest.dest = None;
        assert!(JobHandle::from_job(without_dest, "AutoML").is_err());
    }

    #[test]
    fn test_status_conversion() {
        let status: JobStatus = job(JobState::Done).into();
        assert!(status.is_terminal());
        assert_eq!(status.warnings, vec!["slow"]);
        assert_eq!(status.started_at.unwrap().timestamp(), 1_500_000_000);
    }

    #[test]
    fn test_jitter_saturates() {
        assert_eq!(with_jitter(Duration::MAX, 0.5), Duration::MAX);
        assert_eq!(with_jitter(Duration::from_secs(u64::MAX), 1.0), Duration::MAX);
        let interval = with_jitter(Duration::from_millis(MAX_POLL_INTERVAL_MS), 0.1);
        assert!(interval >= Duration::from_millis(MAX_POLL_INTERVAL_MS));
    }

    #[test]
    fn test_jitter_bounds() {
        let base = Duration::from_millis(1000);
        assert_eq!(with_jitter(base, 0.0), base);
        for _ in 0..100 {
            let delay = with_jitter(base, 0.1);
            assert!(delay >= base);
            assert!(delay <= Duration::from_millis(1100));
        }
    }
}
