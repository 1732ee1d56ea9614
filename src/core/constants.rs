//! Default values and REST endpoint paths used throughout the client.

use crate::core::types::StoppingMetric;

/// Default AutoML wall-clock budget in seconds (one hour).
pub const DEFAULT_MAX_RUNTIME_SECS: u64 = 3600;

/// Default stopping metric; resolved by the server.
pub const DEFAULT_STOPPING_METRIC: StoppingMetric = StoppingMetric::Auto;

/// Default relative tolerance for metric-based stopping.
/// The server may raise it for small datasets.
pub const DEFAULT_STOPPING_TOLERANCE: f64 = 0.001;

/// Default number of non-improving models before stopping (0 disables).
pub const DEFAULT_STOPPING_ROUNDS: u32 = 3;

/// Prefix of the project name derived from the training frame id.
pub const DEFAULT_PROJECT_PREFIX: &str = "automl_";

/// Default H2O cluster address.
pub const DEFAULT_H2O_URL: &str = "http://localhost:54321";

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Initial delay between job status polls in milliseconds.
pub const DEFAULT_POLL_INITIAL_INTERVAL_MS: u64 = 200;

/// Upper bound on the delay between job status polls in milliseconds.
pub const DEFAULT_POLL_MAX_INTERVAL_MS: u64 = 2000;

/// Largest accepted poll delay in milliseconds (one hour).
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;

/// Growth factor applied to the poll delay after each non-terminal status.
pub const DEFAULT_POLL_BACKOFF_FACTOR: f64 = 1.5;

/// Maximum random jitter added to each poll delay, as a fraction of it.
pub const DEFAULT_POLL_JITTER: f64 = 0.1;

/// Schema metadata used to detect AutoML support on the cluster.
pub const AUTOML_SCHEMA_ENDPOINT: &str = "/3/Metadata/schemas/AutoMLV99";

/// AutoML builder endpoint.
pub const AUTOML_BUILDER_ENDPOINT: &str = "/99/AutoMLBuilder";

/// AutoML run query endpoint prefix.
pub const AUTOML_RUN_ENDPOINT: &str = "/99/AutoML";

/// Jobs endpoint prefix.
pub const JOBS_ENDPOINT: &str = "/3/Jobs";

/// Models endpoint prefix.
pub const MODELS_ENDPOINT: &str = "/3/Models";

/// Frames endpoint prefix.
pub const FRAMES_ENDPOINT: &str = "/3/Frames";

/// Predictions endpoint prefix.
pub const PREDICTIONS_ENDPOINT: &str = "/4/Predictions";

/// Crate version string.
pub const H2O_AUTOML_VERSION: &str = env!("CARGO_PKG_VERSION");
