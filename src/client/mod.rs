//! Typed access to the H2O REST endpoints used by AutoML.
//!
//! [`H2oClient`] wraps a [`Transport`] and turns raw JSON into the crate's
//! types. It is cheap to clone and can be shared between several
//! [`AutoML`](crate::automl::AutoML) instances.

pub mod schema;
pub mod transport;

pub use schema::{AutoMLV99, JobV3, KeyV3, TwoDimTableV3};
pub use transport::{HttpTransport, Method, Transport};

use crate::automl::model::Model;
use crate::config::{BuildControl, ConnectionConfig, PollConfig};
use crate::core::constants::*;
use crate::core::error::{H2oAutoMLError, Result};
use crate::dataset::{Frame, InputSpec};
use crate::job::JobHandle;

use serde_json::{json, Value};
use std::sync::Arc;

/// Client for one H2O cluster.
#[derive(Debug, Clone)]
pub struct H2oClient {
    transport: Arc<dyn Transport>,
    poll: PollConfig,
}

impl H2oClient {
    /// Connect over HTTP using `config`.
    ///
    /// No request is made here; the first call reaches the server.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        log::info!("Using H2O cluster at {}", transport.base_url());
        Ok(H2oClient {
            transport: Arc::new(transport),
            poll: config.poll.clone(),
        })
    }

    /// Use a custom transport with default polling.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        H2oClient {
            transport,
            poll: PollConfig::default(),
        }
    }

    /// Replace the polling cadence used by [`JobHandle::wait`].
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Polling cadence
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Issue a raw request.
    pub async fn api(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.transport.request(method, path, body).await
    }

    /// Check that the cluster ships the AutoML extension.
    pub async fn check_automl_support(&self) -> Result<()> {
        self.api(Method::Get, AUTOML_SCHEMA_ENDPOINT, None).await?;
        Ok(())
    }

    /// Submit an AutoML build and return its job.
    ///
    /// A server-side rejection, or a response without a job, is reported as
    /// [`H2oAutoMLError::SubmissionFailed`] carrying the server payload.
    pub async fn build_automl(
        &self,
        input_spec: &InputSpec,
        build_control: &BuildControl,
    ) -> Result<JobHandle> {
        let body = json!({
            "input_spec": input_spec,
            "build_control": build_control,
        });

        let response = match self.api(Method::Post, AUTOML_BUILDER_ENDPOINT, Some(&body)).await {
            Ok(response) => response,
            Err(H2oAutoMLError::Server { body, .. }) => {
                return Err(H2oAutoMLError::submission_failed(body))
            }
            Err(e) => return Err(e),
        };

        if response.get("job").is_none() {
            return Err(H2oAutoMLError::submission_failed(response));
        }
        let job = JobV3::from_response(AUTOML_BUILDER_ENDPOINT, &response)?;
        JobHandle::from_job(job, "AutoML")
    }

    /// Fetch the current state of a job.
    pub async fn job(&self, job_key: &str) -> Result<JobV3> {
        let path = format!("{}/{}", JOBS_ENDPOINT, job_key);
        let response = self.api(Method::Get, &path, None).await?;
        JobV3::from_response(&path, &response)
    }

    /// Ask the cluster to stop a job.
    pub async fn cancel_job(&self, job_key: &str) -> Result<()> {
        let path = format!("{}/{}/cancel", JOBS_ENDPOINT, job_key);
        self.api(Method::Post, &path, None).await?;
        Ok(())
    }

    /// Raw AutoML run description.
    pub async fn automl_run_raw(&self, automl_key: &str) -> Result<Value> {
        let path = format!("{}/{}", AUTOML_RUN_ENDPOINT, automl_key);
        self.api(Method::Get, &path, None).await
    }

    /// Decoded AutoML run description.
    pub async fn automl_run(&self, automl_key: &str) -> Result<AutoMLV99> {
        let path = format!("{}/{}", AUTOML_RUN_ENDPOINT, automl_key);
        let response = self.api(Method::Get, &path, None).await?;
        serde_json::from_value(response)
            .map_err(|e| H2oAutoMLError::unexpected_response(path, e.to_string()))
    }

    /// Fetch a model by id.
    pub async fn model(&self, model_id: &str) -> Result<Model> {
        let path = format!("{}/{}", MODELS_ENDPOINT, model_id);
        let response = self.api(Method::Get, &path, None).await?;
        Model::from_response(self.clone(), &path, &response)
    }

    /// Start scoring `frame_id` with `model_id`; the job's destination is
    /// the prediction frame.
    pub async fn start_prediction(&self, model_id: &str, frame_id: &str) -> Result<JobHandle> {
        let path = format!("{}/models/{}/frames/{}", PREDICTIONS_ENDPOINT, model_id, frame_id);
        let response = self.api(Method::Post, &path, None).await?;
        let job = JobV3::from_response(&path, &response)?;
        JobHandle::from_job(job, "prediction")
    }

    /// Fetch a frame's schema by id.
    pub async fn frame(&self, frame_id: &str) -> Result<Frame> {
        let path = format!("{}/{}", FRAMES_ENDPOINT, frame_id);
        let response = self.api(Method::Get, &path, None).await?;
        let frame: schema::FrameV3 = schema::first_of(&path, &response, "frames")?;
        let mut result = Frame::new(frame.frame_id.name, frame.columns.into_iter().map(|c| c.label));
        if let Some(rows) = frame.rows {
            result = result.with_rows(rows);
        }
        Ok(result)
    }
}
