//! AutoML runs: submission, waiting, and result access.
//!
//! [`AutoML`] composes the request validator, the job client and the result
//! fetcher. One instance drives one run at a time; several instances can
//! share an [`H2oClient`] and run concurrently.
//!
//! # Example
//!
//! ```no_run
//! use h2o_automl::{AutoML, AutoMLConfig, ConnectionConfig, H2oClient, TrainRequest};
//!
//! # async fn run() -> h2o_automl::Result<()> {
//! let client = H2oClient::connect(&ConnectionConfig::default())?;
//! let config = AutoMLConfig::builder().max_models(10).seed(1).build()?;
//! let mut automl = AutoML::new(client.clone(), config).await;
//!
//! let train = client.frame("train.hex").await?;
//! automl.train(&TrainRequest::new("label", &train)).await?;
//!
//! if let Some(leader) = automl.leader().await? {
//!     println!("leader: {}", leader.id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod leaderboard;
pub mod model;

pub use leaderboard::Leaderboard;
pub use model::Model;

use crate::client::H2oClient;
use crate::config::AutoMLConfig;
use crate::core::constants::DEFAULT_PROJECT_PREFIX;
use crate::core::error::{H2oAutoMLError, Result};
use crate::dataset::{Frame, TrainRequest};
use crate::job::JobHandle;

use serde_json::Value;

/// Client-side handle for AutoML runs on one H2O cluster.
#[derive(Debug)]
pub struct AutoML {
    client: H2oClient,
    config: AutoMLConfig,
    resolved_project_name: Option<String>,
    job: Option<JobHandle>,
    automl_key: Option<String>,
    leader_id: Option<String>,
    leaderboard: Option<Leaderboard>,
}

impl AutoML {
    /// Create a facade and probe the cluster for AutoML support.
    ///
    /// A failed probe is logged, not returned: the first submission reports
    /// the real problem if the extension is missing.
    pub async fn new(client: H2oClient, config: AutoMLConfig) -> Self {
        if let Err(e) = client.check_automl_support().await {
            log::warn!(
                "Could not verify AutoML support on the cluster ({}). \
                 Please verify that your H2O jar has the proper AutoML extensions.",
                e
            );
        }
        Self::without_probe(client, config)
    }

    /// Create a facade without contacting the cluster.
    pub fn without_probe(client: H2oClient, config: AutoMLConfig) -> Self {
        AutoML {
            client,
            config,
            resolved_project_name: None,
            job: None,
            automl_key: None,
            leader_id: None,
            leaderboard: None,
        }
    }

    /// Underlying cluster client
    pub fn client(&self) -> &H2oClient {
        &self.client
    }

    /// Run configuration
    pub fn config(&self) -> &AutoMLConfig {
        &self.config
    }

    /// Project name: the configured one, otherwise `automl_<frame id>` once
    /// a run has completed.
    pub fn project_name(&self) -> Option<&str> {
        self.config
            .project_name()
            .or(self.resolved_project_name.as_deref())
    }

    /// Key of the current run on the server
    pub fn automl_key(&self) -> Option<&str> {
        self.automl_key.as_deref()
    }

    /// Job of the current run
    pub fn job(&self) -> Option<&JobHandle> {
        self.job.as_ref()
    }

    /// Last fetched leaderboard, `None` before any successful fetch
    pub fn leaderboard(&self) -> Option<&Leaderboard> {
        self.leaderboard.as_ref()
    }

    /// Id of the best model in the last fetched leaderboard
    pub fn leader_id(&self) -> Option<&str> {
        self.leader_id.as_deref()
    }

    /// Validate `request` and submit the run without waiting for it.
    ///
    /// Validation errors are returned before any request is made. On
    /// success the previous run's leaderboard is discarded.
    pub async fn submit(&mut self, request: &TrainRequest<'_>) -> Result<JobHandle> {
        let input_spec = request.input_spec()?;
        let build_control = self.config.build_control();

        log::info!(
            "Submitting AutoML run on {} (response: {}, max_runtime_secs: {})",
            input_spec.training_frame,
            input_spec.response_column,
            build_control.stopping_criteria.max_runtime_secs
        );
        let job = self.client.build_automl(&input_spec, &build_control).await?;
        log::info!("AutoML job {} started, run key {}", job.job_key(), job.dest_key());

        self.automl_key = Some(job.dest_key().to_string());
        self.job = Some(job.clone());
        self.leader_id = None;
        self.leaderboard = None;
        Ok(job)
    }

    /// Submit a run, wait for it to finish, and fetch its leaderboard.
    pub async fn train(&mut self, request: &TrainRequest<'_>) -> Result<()> {
        let job = self.submit(request).await?;
        job.wait(&self.client).await?;

        let has_leader = self.refresh().await?;
        if !has_leader {
            log::warn!("AutoML run {} finished without building any model", job.dest_key());
        }

        if self.project_name().is_none() {
            if let Some(frame) = request.get_training_frame() {
                self.resolved_project_name = Some(format!("{}{}", DEFAULT_PROJECT_PREFIX, frame.id()));
            }
        }
        Ok(())
    }

    /// [`train`](AutoML::train) on a private single-threaded runtime.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime.
    pub fn train_blocking(&mut self, request: &TrainRequest<'_>) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.train(request))
    }

    /// Re-fetch the leaderboard of the current run.
    ///
    /// Replaces the previous leaderboard and leader wholesale and returns
    /// whether a leader exists. Without a run this is `Ok(false)` and no
    /// request is made.
    pub async fn refresh(&mut self) -> Result<bool> {
        let key = match self.automl_key {
            Some(ref key) => key.clone(),
            None => {
                log::debug!("No AutoML run to refresh");
                return Ok(false);
            }
        };

        let run = self.client.automl_run(&key).await?;
        let leaderboard = Leaderboard::from_run(&run)?;
        log::debug!("AutoML run {}: {} models on the leaderboard", key, leaderboard.len());

        self.leader_id = leaderboard.leader_id().map(str::to_string);
        self.leaderboard = Some(leaderboard);
        Ok(self.leader_id.is_some())
    }

    /// Resolve the leader to a full model; `None` if no run produced one.
    pub async fn leader(&self) -> Result<Option<Model>> {
        match self.leader_id {
            Some(ref id) => Ok(Some(self.client.model(id).await?)),
            None => Ok(None),
        }
    }

    /// Score `test_data` with the current leader.
    ///
    /// Returns [`H2oAutoMLError::NoTrainedModel`] when no run has been made
    /// or the run built no model.
    pub async fn predict(&mut self, test_data: &Frame) -> Result<Frame> {
        if self.automl_key.is_none() {
            return Err(H2oAutoMLError::no_trained_model(
                "no AutoML run has been submitted",
            ));
        }
        if !self.refresh().await? {
            return Err(H2oAutoMLError::no_trained_model(
                "the AutoML run has not built any model yet",
            ));
        }

        let leader = self.leader().await?.ok_or_else(|| {
            H2oAutoMLError::no_trained_model("the AutoML run has not built any model yet")
        })?;
        leader.predict(test_data).await
    }

    /// Raw run description, including fields this crate does not decode.
    pub async fn run_info(&self) -> Result<Value> {
        let key = self.automl_key.as_deref().ok_or_else(|| {
            H2oAutoMLError::no_trained_model("no AutoML run has been submitted")
        })?;
        self.client.automl_run_raw(key).await
    }
}
