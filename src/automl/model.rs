//! Handle to a trained model on the cluster.

use crate::client::schema::{first_of, ModelSchemaV3};
use crate::client::H2oClient;
use crate::core::error::Result;
use crate::dataset::Frame;

use serde_json::Value;

/// A model stored on the cluster.
#[derive(Debug, Clone)]
pub struct Model {
    client: H2oClient,
    id: String,
    algo: String,
    algo_full_name: Option<String>,
    response_column: Option<String>,
    raw: Value,
}

impl Model {
    /// Decode a `/3/Models/{id}` response.
    pub(crate) fn from_response(client: H2oClient, endpoint: &str, body: &Value) -> Result<Self> {
        let schema: ModelSchemaV3 = first_of(endpoint, body, "models")?;
        let raw = body
            .get("models")
            .and_then(|models| models.get(0))
            .cloned()
            .unwrap_or(Value::Null);

        Ok(Model {
            client,
            id: schema.model_id.name,
            algo: schema.algo,
            algo_full_name: schema.algo_full_name,
            response_column: schema.response_column_name,
            raw,
        })
    }

    /// Model key
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Short algorithm name, e.g. `gbm` or `stackedensemble`
    pub fn algo(&self) -> &str {
        &self.algo
    }

    /// Long algorithm name
    pub fn algo_full_name(&self) -> Option<&str> {
        self.algo_full_name.as_deref()
    }

    /// Response column the model was trained on
    pub fn response_column(&self) -> Option<&str> {
        self.response_column.as_deref()
    }

    /// Full model description as returned by the server
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Score `test_data` and return the prediction frame.
    ///
    /// Blocks (asynchronously) until the scoring job finishes.
    pub async fn predict(&self, test_data: &Frame) -> Result<Frame> {
        log::info!("Scoring frame {} with model {}", test_data.id(), self.id);
        let job = self.client.start_prediction(&self.id, test_data.id()).await?;
        job.wait(&self.client).await?;
        self.client.frame(job.dest_key()).await
    }
}
