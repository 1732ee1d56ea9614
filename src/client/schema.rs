//! Response schemas of the H2O REST endpoints this client reads.
//!
//! Only the fields the client uses are declared; everything else in the
//! server payloads is ignored.

use crate::core::error::{H2oAutoMLError, Result};
use crate::core::types::JobState;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a keyed object (`KeyV3`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyV3 {
    /// Key name
    pub name: String,
}

/// A background job (`JobV3`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobV3 {
    /// Job key
    pub key: KeyV3,
    /// Key of the object the job produces
    #[serde(default)]
    pub dest: Option<KeyV3>,
    /// Current state
    pub status: JobState,
    /// Completion fraction in `[0, 1]`
    #[serde(default)]
    pub progress: f64,
    /// Human-readable progress message
    #[serde(default)]
    pub progress_msg: Option<String>,
    /// Start time, epoch milliseconds
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Runtime so far in milliseconds
    #[serde(default)]
    pub msec: u64,
    /// Job description
    #[serde(default)]
    pub description: Option<String>,
    /// Failure message
    #[serde(default)]
    pub exception: Option<String>,
    /// Failure stack trace
    #[serde(default)]
    pub stacktrace: Option<String>,
    /// Non-fatal warnings
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

impl JobV3 {
    /// Extract the job from a response body.
    ///
    /// Builder endpoints wrap it as `{"job": ...}`, the jobs endpoint as
    /// `{"jobs": [...]}`, and prediction endpoints return it bare.
    pub fn from_response(endpoint: &str, body: &Value) -> Result<JobV3> {
        let job = if let Some(job) = body.get("job") {
            job
        } else if let Some(jobs) = body.get("jobs") {
            jobs.get(0).ok_or_else(|| {
                H2oAutoMLError::unexpected_response(endpoint, "empty 'jobs' list")
            })?
        } else if body.get("key").is_some() {
            body
        } else {
            return Err(H2oAutoMLError::unexpected_response(endpoint, "no job in response"));
        };
        serde_json::from_value(job.clone())
            .map_err(|e| H2oAutoMLError::unexpected_response(endpoint, e.to_string()))
    }
}

/// Query result of an AutoML run (`AutoMLV99`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMLV99 {
    /// Ranked models
    pub leaderboard: LeaderboardV99,
    /// Leaderboard as a two-dimensional table
    #[serde(default)]
    pub leaderboard_table: Option<TwoDimTableV3>,
    /// Project name assigned by the server
    #[serde(default)]
    pub project_name: Option<String>,
}

/// `leaderboard` field of [`AutoMLV99`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderboardV99 {
    /// Model keys, best first
    #[serde(default)]
    pub models: Vec<KeyV3>,
    /// Metric used for ranking
    #[serde(default)]
    pub sort_metric: Option<String>,
}

/// Column descriptor of a [`TwoDimTableV3`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpecV3 {
    /// Column header
    pub name: String,
    /// Cell type: `string`, `double`, `float`, `int`, `long`
    #[serde(rename = "type")]
    pub column_type: String,
    /// printf-style format
    #[serde(default)]
    pub format: Option<String>,
    /// Column description
    #[serde(default)]
    pub description: Option<String>,
}

/// H2O's generic table schema (`TwoDimTableV3`). `data` is column-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoDimTableV3 {
    /// Table name
    #[serde(default)]
    pub name: Option<String>,
    /// Column descriptors
    pub columns: Vec<ColumnSpecV3>,
    /// Number of rows
    pub rowcount: usize,
    /// Cells, one vector per column
    pub data: Vec<Vec<Value>>,
}

/// Model description (`ModelSchemaV3`), reduced to its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchemaV3 {
    /// Model key
    pub model_id: KeyV3,
    /// Short algorithm name, e.g. `gbm`
    pub algo: String,
    /// Long algorithm name
    #[serde(default)]
    pub algo_full_name: Option<String>,
    /// Response column the model was trained on
    #[serde(default)]
    pub response_column_name: Option<String>,
}

/// Column descriptor of a [`FrameV3`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameColumnV3 {
    /// Column name
    pub label: String,
    /// Column type
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,
}

/// Frame description (`FrameV3`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameV3 {
    /// Frame key
    pub frame_id: KeyV3,
    /// Row count
    #[serde(default)]
    pub rows: Option<u64>,
    /// Columns in order
    #[serde(default)]
    pub columns: Vec<FrameColumnV3>,
}

/// Decode the first element of a `{"<field>": [...]}` list response.
pub(crate) fn first_of<T>(endpoint: &str, body: &Value, field: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let item = body
        .get(field)
        .and_then(|items| items.get(0))
        .ok_or_else(|| H2oAutoMLError::unexpected_response(endpoint, format!("no '{}' in response", field)))?;
    serde_json::from_value(item.clone())
        .map_err(|e| H2oAutoMLError::unexpected_response(endpoint, e.to_string()))
}
