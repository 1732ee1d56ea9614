//! Common test utilities for H2O AutoML client integration tests.
//!
//! [`MockTransport`] stands in for an H2O cluster: each `(method, path)`
//! route replays a queue of canned responses, keeping the last one once the
//! queue drains, and every request is recorded for later assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use h2o_automl::*;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One canned response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 2xx with a JSON body
    Json(Value),
    /// Error status with an H2O error body
    Error { status: u16, body: Value },
}

/// A request seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory [`Transport`] replaying canned H2O responses.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a JSON response for `method path`.
    pub fn on(&self, method: Method, path: &str, response: Value) -> &Self {
        self.push(method, path, MockResponse::Json(response))
    }

    /// Queue an error response for `method path`.
    pub fn on_error(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, MockResponse::Error { status, body })
    }

    fn push(&self, method: Method, path: &str, response: MockResponse) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    /// All requests, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made to `path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Body of the last request to `path`.
    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| r.body.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let response = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(method, path.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match response {
            Some(MockResponse::Json(value)) => Ok(value),
            Some(MockResponse::Error { status, body }) => Err(H2oAutoMLError::Server {
                status,
                message: h2o_automl::client::transport::server_message(&body),
                body,
            }),
            None => Err(H2oAutoMLError::Server {
                status: 404,
                message: format!("no route for {} {}", method, path),
                body: Value::Null,
            }),
        }
    }
}

pub const JOB_KEY: &str = "$03017f00000132d4ffffffff$_automl_job";
pub const AUTOML_KEY: &str = "automl_train.hex";

/// Client over `mock` with a 1 ms fixed poll interval.
pub fn client(mock: &Arc<MockTransport>) -> H2oClient {
    H2oClient::with_transport(mock.clone()).with_poll_config(PollConfig::fixed(Duration::from_millis(1)))
}

/// A `JobV3` body.
pub fn job_json(key: &str, dest: &str, status: &str) -> Value {
    let progress = if status == "DONE" { 1.0 } else { 0.4 };
    json!({
        "key": {"name": key, "type": "Key<Job>"},
        "dest": {"name": dest},
        "status": status,
        "progress": progress,
        "progress_msg": "Building models",
        "start_time": 1_700_000_000_000i64,
        "msec": 5400,
        "description": "AutoML build"
    })
}

/// Builder response wrapping a freshly created job.
pub fn builder_response(job_key: &str, dest: &str) -> Value {
    json!({"job": job_json(job_key, dest, "CREATED")})
}

/// `/3/Jobs/{key}` response.
pub fn jobs_response(job_key: &str, dest: &str, status: &str) -> Value {
    json!({"jobs": [job_json(job_key, dest, status)]})
}

/// `/99/AutoML/{key}` response listing `models`, best first.
pub fn automl_response(models: &[&str]) -> Value {
    let auc: Vec<f64> = (0..models.len()).map(|i| 0.95 - i as f64 * 0.01).collect();
    let logloss: Vec<f64> = (0..models.len()).map(|i| 0.20 + i as f64 * 0.02).collect();
    let row_headers: Vec<String> = (0..models.len()).map(|i| i.to_string()).collect();
    json!({
        "project_name": "automl_train.hex",
        "leaderboard": {
            "models": models.iter().map(|m| json!({"name": m})).collect::<Vec<_>>(),
            "sort_metric": "auc"
        },
        "leaderboard_table": {
            "name": "Leaderboard",
            "columns": [
                {"name": "", "type": "string"},
                {"name": "model_id", "type": "string"},
                {"name": "auc", "type": "double"},
                {"name": "logloss", "type": "double"}
            ],
            "rowcount": models.len(),
            "data": [row_headers, models, auc, logloss]
        }
    })
}

/// `/3/Models/{id}` response.
pub fn model_response(id: &str, algo: &str) -> Value {
    json!({
        "models": [{
            "model_id": {"name": id},
            "algo": algo,
            "algo_full_name": "Gradient Boosting Machine",
            "response_column_name": "target"
        }]
    })
}

/// `/3/Frames/{id}` response.
pub fn frame_response(id: &str, columns: &[&str], rows: u64) -> Value {
    json!({
        "frames": [{
            "frame_id": {"name": id},
            "rows": rows,
            "columns": columns.iter().map(|c| json!({"label": c, "type": "real"})).collect::<Vec<_>>()
        }]
    })
}

/// Path helpers
pub fn job_path(key: &str) -> String {
    format!("{}/{}", JOBS_ENDPOINT, key)
}

pub fn automl_path(key: &str) -> String {
    format!("{}/{}", AUTOML_RUN_ENDPOINT, key)
}

pub fn model_path(id: &str) -> String {
    format!("{}/{}", MODELS_ENDPOINT, id)
}

pub fn frame_path(id: &str) -> String {
    format!("{}/{}", FRAMES_ENDPOINT, id)
}

pub fn prediction_path(model: &str, frame: &str) -> String {
    format!("{}/models/{}/frames/{}", PREDICTIONS_ENDPOINT, model, frame)
}

/// Routes for a full successful run on `train.hex` producing `models`.
pub fn mock_successful_run(mock: &MockTransport, models: &[&str]) {
    mock.on(Method::Get, AUTOML_SCHEMA_ENDPOINT, json!({"schemas": [{"name": "AutoMLV99"}]}));
    mock.on(Method::Post, AUTOML_BUILDER_ENDPOINT, builder_response(JOB_KEY, AUTOML_KEY));
    mock.on(Method::Get, &job_path(JOB_KEY), jobs_response(JOB_KEY, AUTOML_KEY, "RUNNING"));
    mock.on(Method::Get, &job_path(JOB_KEY), jobs_response(JOB_KEY, AUTOML_KEY, "DONE"));
    mock.on(Method::Get, &automl_path(AUTOML_KEY), automl_response(models));
}

/// A training frame `train.hex` with columns a, b, c, target.
pub fn training_frame() -> Frame {
    Frame::new("train.hex", ["a", "b", "c", "target"]).with_rows(1000)
}
