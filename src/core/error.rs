//! Error handling and error types for the H2O AutoML client.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`H2oAutoMLError`]. Validation failures are raised before any request
//! leaves the process; remote failures carry the server's diagnostic.

use std::io;
use thiserror::Error;

/// Main error type for the H2O AutoML client.
#[derive(Error, Debug)]
pub enum H2oAutoMLError {
    /// Configuration errors (file format, environment variables, ...)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid budget or connection parameter
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// A required argument was not supplied
    #[error("Missing required parameter '{parameter}': {reason}")]
    MissingParameter { parameter: String, reason: String },

    /// Column name not present in the training frame
    #[error("Column {column} does not exist in the training frame")]
    ColumnNotFound { column: String },

    /// Column index outside `-ncols..ncols`
    #[error("Column {index} does not exist in the training frame (frame has {ncols} columns)")]
    ColumnIndexOutOfBounds { index: i64, ncols: usize },

    /// The builder endpoint rejected the request or returned no job
    #[error("AutoML submission failed: {diagnostic}")]
    SubmissionFailed { diagnostic: serde_json::Value },

    /// The remote job finished in the FAILED state
    #[error("Job {job_key} failed: {message}")]
    JobFailed { job_key: String, message: String },

    /// The remote job was cancelled before completion
    #[error("Job {job_key} was cancelled")]
    JobCancelled { job_key: String },

    /// `predict` or `leader` called without a trained leader model
    #[error("No trained model available: {reason}")]
    NoTrainedModel { reason: String },

    /// The server answered with an error status
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    /// The server answered with a payload this client cannot interpret
    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },

    /// Leaderboard materialization errors
    #[error("Leaderboard error: {message}")]
    Leaderboard { message: String },

    /// HTTP transport errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// DataFrame construction errors
    #[error("DataFrame error: {source}")]
    Polars {
        #[from]
        source: polars::prelude::PolarsError,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// Internal client errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using H2oAutoMLError
pub type Result<T> = std::result::Result<T, H2oAutoMLError>;

impl H2oAutoMLError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        H2oAutoMLError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        H2oAutoMLError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_parameter<P: Into<String>, R: Into<String>>(parameter: P, reason: R) -> Self {
        H2oAutoMLError::MissingParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a column-not-found error
    pub fn column_not_found<S: Into<String>>(column: S) -> Self {
        H2oAutoMLError::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Create a column index out of bounds error
    pub fn column_index_out_of_bounds(index: i64, ncols: usize) -> Self {
        H2oAutoMLError::ColumnIndexOutOfBounds { index, ncols }
    }

    /// Create a submission failure carrying the server payload
    pub fn submission_failed(diagnostic: serde_json::Value) -> Self {
        H2oAutoMLError::SubmissionFailed { diagnostic }
    }

    /// Create a no-trained-model error
    pub fn no_trained_model<S: Into<String>>(reason: S) -> Self {
        H2oAutoMLError::NoTrainedModel {
            reason: reason.into(),
        }
    }

    /// Create an unexpected response error
    pub fn unexpected_response<E: Into<String>, M: Into<String>>(endpoint: E, message: M) -> Self {
        H2oAutoMLError::UnexpectedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a leaderboard error
    pub fn leaderboard<S: Into<String>>(message: S) -> Self {
        H2oAutoMLError::Leaderboard {
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        H2oAutoMLError::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors come from the remote side and may succeed on retry
    /// or with a corrected server state; the rest are caller mistakes.
    pub fn is_recoverable(&self) -> bool {
        match self {
            H2oAutoMLError::Config { .. } => false,
            H2oAutoMLError::InvalidParameter { .. } => false,
            H2oAutoMLError::MissingParameter { .. } => false,
            H2oAutoMLError::ColumnNotFound { .. } => false,
            H2oAutoMLError::ColumnIndexOutOfBounds { .. } => false,
            H2oAutoMLError::SubmissionFailed { .. } => true,
            H2oAutoMLError::JobFailed { .. } => true,
            H2oAutoMLError::JobCancelled { .. } => true,
            H2oAutoMLError::NoTrainedModel { .. } => true,
            H2oAutoMLError::Server { .. } => true,
            H2oAutoMLError::UnexpectedResponse { .. } => false,
            H2oAutoMLError::Leaderboard { .. } => false,
            H2oAutoMLError::Http { .. } => true,
            H2oAutoMLError::Json { .. } => false,
            H2oAutoMLError::Polars { .. } => false,
            H2oAutoMLError::IO { .. } => false,
            H2oAutoMLError::Internal { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            H2oAutoMLError::Config { .. } => "config",
            H2oAutoMLError::InvalidParameter { .. } => "invalid_parameter",
            H2oAutoMLError::MissingParameter { .. } => "missing_parameter",
            H2oAutoMLError::ColumnNotFound { .. } => "column_not_found",
            H2oAutoMLError::ColumnIndexOutOfBounds { .. } => "column_index_out_of_bounds",
            H2oAutoMLError::SubmissionFailed { .. } => "submission_failed",
            H2oAutoMLError::JobFailed { .. } => "job_failed",
            H2oAutoMLError::JobCancelled { .. } => "job_cancelled",
            H2oAutoMLError::NoTrainedModel { .. } => "no_trained_model",
            H2oAutoMLError::Server { .. } => "server",
            H2oAutoMLError::UnexpectedResponse { .. } => "unexpected_response",
            H2oAutoMLError::Leaderboard { .. } => "leaderboard",
            H2oAutoMLError::Http { .. } => "http",
            H2oAutoMLError::Json { .. } => "json",
            H2oAutoMLError::Polars { .. } => "polars",
            H2oAutoMLError::IO { .. } => "io",
            H2oAutoMLError::Internal { .. } => "internal",
        }
    }

    /// True for errors raised by local validation, before any network call.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            H2oAutoMLError::InvalidParameter { .. }
                | H2oAutoMLError::MissingParameter { .. }
                | H2oAutoMLError::ColumnNotFound { .. }
                | H2oAutoMLError::ColumnIndexOutOfBounds { .. }
        )
    }
}

/// Convenience macro for configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::H2oAutoMLError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::H2oAutoMLError::config(format!($fmt, $($arg)*))
    };
}
