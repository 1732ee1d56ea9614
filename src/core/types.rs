//! Core data types for the H2O AutoML client.
//!
//! These are the small value types shared by configuration, request
//! validation and job polling: the stopping metric enumeration, column
//! references, and remote job states.

use crate::core::error::{H2oAutoMLError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metric used by the server for early stopping.
///
/// `Auto` is resolved by the server: `logloss` for classification and
/// `deviance` for regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoppingMetric {
    /// Let the server pick the metric
    #[serde(rename = "AUTO")]
    Auto,
    /// Mean residual deviance
    #[serde(rename = "deviance")]
    Deviance,
    /// Logarithmic loss
    #[serde(rename = "logloss")]
    Logloss,
    /// Mean squared error
    #[serde(rename = "mse")]
    Mse,
    /// Root mean squared error
    #[serde(rename = "rmse")]
    Rmse,
    /// Mean absolute error
    #[serde(rename = "mae")]
    Mae,
    /// Root mean squared logarithmic error
    #[serde(rename = "rmsle")]
    Rmsle,
    /// Area under the ROC curve
    #[serde(rename = "auc")]
    Auc,
    /// Lift in the top group
    #[serde(rename = "lift_top_group")]
    LiftTopGroup,
    /// Misclassification rate
    #[serde(rename = "misclassification")]
    Misclassification,
    /// Mean per-class error
    #[serde(rename = "mean_per_class_error")]
    MeanPerClassError,
}

impl StoppingMetric {
    /// Every metric the AutoML builder accepts.
    pub const ALL: [StoppingMetric; 11] = [
        StoppingMetric::Auto,
        StoppingMetric::Deviance,
        StoppingMetric::Logloss,
        StoppingMetric::Mse,
        StoppingMetric::Rmse,
        StoppingMetric::Mae,
        StoppingMetric::Rmsle,
        StoppingMetric::Auc,
        StoppingMetric::LiftTopGroup,
        StoppingMetric::Misclassification,
        StoppingMetric::MeanPerClassError,
    ];

    /// Wire name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoppingMetric::Auto => "AUTO",
            StoppingMetric::Deviance => "deviance",
            StoppingMetric::Logloss => "logloss",
            StoppingMetric::Mse => "mse",
            StoppingMetric::Rmse => "rmse",
            StoppingMetric::Mae => "mae",
            StoppingMetric::Rmsle => "rmsle",
            StoppingMetric::Auc => "auc",
            StoppingMetric::LiftTopGroup => "lift_top_group",
            StoppingMetric::Misclassification => "misclassification",
            StoppingMetric::MeanPerClassError => "mean_per_class_error",
        }
    }
}

impl Default for StoppingMetric {
    fn default() -> Self {
        StoppingMetric::Auto
    }
}

impl fmt::Display for StoppingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StoppingMetric {
    type Err = H2oAutoMLError;

    fn from_str(s: &str) -> Result<Self> {
        StoppingMetric::ALL
            .iter()
            .copied()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| {
                let options: Vec<&str> = StoppingMetric::ALL.iter().map(|m| m.as_str()).collect();
                H2oAutoMLError::invalid_parameter(
                    "stopping_metric",
                    s,
                    format!("must be one of {}", options.join(", ")),
                )
            })
    }
}

/// Reference to a column of a frame, either by position or by name.
///
/// Negative positions count from the end of the frame, so `-1` is the last
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// Column position
    Index(i64),
    /// Column name
    Name(String),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(index) => write!(f, "{}", index),
            ColumnRef::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<&String> for ColumnRef {
    fn from(name: &String) -> Self {
        ColumnRef::Name(name.clone())
    }
}

impl From<i64> for ColumnRef {
    fn from(index: i64) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<i32> for ColumnRef {
    fn from(index: i32) -> Self {
        ColumnRef::Index(i64::from(index))
    }
}

impl From<usize> for ColumnRef {
    /// Positions beyond `i64::MAX` saturate, so they stay out of range
    /// instead of wrapping to a negative index.
    fn from(index: usize) -> Self {
        ColumnRef::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// State of a remote job as reported by `GET /3/Jobs/{key}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    /// Created but not yet started
    Created,
    /// Running on the cluster
    Running,
    /// Finished successfully
    Done,
    /// Finished with an error
    Failed,
    /// Stopped at the user's request
    Cancelled,
}

impl JobState {
    /// Whether the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed | JobState::Cancelled)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Created => write!(f, "CREATED"),
            JobState::Running => write!(f, "RUNNING"),
            JobState::Done => write!(f, "DONE"),
            JobState::Failed => write!(f, "FAILED"),
            JobState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopping_metric_round_trip_names() {
        for metric in StoppingMetric::ALL {
            assert_eq!(metric.as_str().parse::<StoppingMetric>().unwrap(), metric);
        }
        assert_eq!(StoppingMetric::default(), StoppingMetric::Auto);
    }

    #[test]
    fn test_stopping_metric_rejects_unknown() {
        let err = "accuracy".parse::<StoppingMetric>().unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
        assert!(err.to_string().contains("stopping_metric"));
    }

    #[test]
    fn test_stopping_metric_serializes_wire_name() {
        let json = serde_json::to_string(&StoppingMetric::LiftTopGroup).unwrap();
        assert_eq!(json, "\"lift_top_group\"");
        let json = serde_json::to_string(&StoppingMetric::Auto).unwrap();
        assert_eq!(json, "\"AUTO\"");
    }

    #[test]
    fn test_column_ref_conversions() {
        assert_eq!(ColumnRef::from("a"), ColumnRef::Name("a".to_string()));
        assert_eq!(ColumnRef::from(-1), ColumnRef::Index(-1));
        assert_eq!(ColumnRef::from(2usize), ColumnRef::Index(2));
        assert_eq!(ColumnRef::from(-3).to_string(), "-3");
    }

    #[test]
    fn test_job_state_parsing() {
        let state: JobState = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(state, JobState::Running);
        assert!(!state.is_terminal());
        let state: JobState = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert!(state.is_terminal());
    }
}
