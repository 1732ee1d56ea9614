//! Training request validation.
//!
//! A [`TrainRequest`] names the column roles of an AutoML run by index or
//! name. [`TrainRequest::input_spec`] checks every reference against the
//! training frame and produces the normalized [`InputSpec`] sent to the
//! builder endpoint. All checks run before any network call.

use crate::core::error::{H2oAutoMLError, Result};
use crate::core::types::ColumnRef;
use crate::dataset::frame::Frame;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// `input_spec` object of the AutoML builder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Response column name
    pub response_column: String,
    /// Training frame key
    pub training_frame: String,
    /// Fold assignment column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fold_column: Option<String>,
    /// Row weights column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights_column: Option<String>,
    /// Validation frame key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_frame: Option<String>,
    /// Leaderboard frame key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaderboard_frame: Option<String>,
    /// Columns the server must not use as predictors, in frame order
    #[serde(default)]
    pub ignored_columns: Vec<String>,
    /// Predictor columns the run will use. Local only; the server derives
    /// them from `ignored_columns`.
    #[serde(skip)]
    pub predictors: Vec<String>,
}

/// Column roles and frames for one `train` call.
#[derive(Debug, Clone, Default)]
pub struct TrainRequest<'a> {
    x: Option<Vec<ColumnRef>>,
    y: Option<ColumnRef>,
    training_frame: Option<&'a Frame>,
    fold_column: Option<ColumnRef>,
    weights_column: Option<ColumnRef>,
    validation_frame: Option<&'a Frame>,
    leaderboard_frame: Option<&'a Frame>,
}

impl<'a> TrainRequest<'a> {
    /// Request with the two required arguments set.
    pub fn new<Y: Into<ColumnRef>>(y: Y, training_frame: &'a Frame) -> Self {
        TrainRequest {
            y: Some(y.into()),
            training_frame: Some(training_frame),
            ..Default::default()
        }
    }

    /// Restrict predictors to these columns (names or indices).
    pub fn x<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.x = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the response column
    pub fn y<C: Into<ColumnRef>>(mut self, column: C) -> Self {
        self.y = Some(column.into());
        self
    }

    /// Set the training frame
    pub fn training_frame(mut self, frame: &'a Frame) -> Self {
        self.training_frame = Some(frame);
        self
    }

    /// Set the fold assignment column
    pub fn fold_column<C: Into<ColumnRef>>(mut self, column: C) -> Self {
        self.fold_column = Some(column.into());
        self
    }

    /// Set the row weights column
    pub fn weights_column<C: Into<ColumnRef>>(mut self, column: C) -> Self {
        self.weights_column = Some(column.into());
        self
    }

    /// Score models on this frame during training
    pub fn validation_frame(mut self, frame: &'a Frame) -> Self {
        self.validation_frame = Some(frame);
        self
    }

    /// Rank models on this frame instead of cross-validation metrics
    pub fn leaderboard_frame(mut self, frame: &'a Frame) -> Self {
        self.leaderboard_frame = Some(frame);
        self
    }

    /// The training frame, if set
    pub fn get_training_frame(&self) -> Option<&'a Frame> {
        self.training_frame
    }

    /// Validate the request and build the normalized input spec.
    pub fn input_spec(&self) -> Result<InputSpec> {
        let y = self.y.as_ref().ok_or_else(|| {
            H2oAutoMLError::missing_parameter(
                "y",
                "the response column is not set; set it to the column you are trying to predict",
            )
        })?;
        let frame = self.training_frame.ok_or_else(|| {
            H2oAutoMLError::missing_parameter("training_frame", "the training frame is not set")
        })?;

        let response = frame.resolve_column(y)?;
        let fold = self
            .fold_column
            .as_ref()
            .map(|c| resolve_auxiliary_column(frame, c))
            .transpose()?;
        let weights = self
            .weights_column
            .as_ref()
            .map(|c| resolve_auxiliary_column(frame, c))
            .transpose()?;

        let selected = match self.x {
            Some(ref x) => Some(unique_columns(frame, x)?),
            None => None,
        };

        let mut excluded: HashSet<&str> = HashSet::new();
        excluded.insert(response.as_str());
        if let Some(ref fold) = fold {
            excluded.insert(fold.as_str());
        }
        if let Some(ref weights) = weights {
            excluded.insert(weights.as_str());
        }

        let (predictors, ignored_columns): (Vec<String>, Vec<String>) = match selected {
            Some(selected) => {
                let chosen: HashSet<&str> = selected.iter().map(String::as_str).collect();
                let ignored = frame
                    .names()
                    .iter()
                    .filter(|c| !excluded.contains(c.as_str()) && !chosen.contains(c.as_str()))
                    .cloned()
                    .collect();
                let predictors = selected
                    .into_iter()
                    .filter(|c| !excluded.contains(c.as_str()))
                    .collect();
                (predictors, ignored)
            }
            None => {
                let predictors = frame
                    .names()
                    .iter()
                    .filter(|c| !excluded.contains(c.as_str()))
                    .cloned()
                    .collect();
                (predictors, Vec::new())
            }
        };

        log::debug!(
            "input spec for {}: response={}, {} predictors, {} ignored",
            frame.id(),
            response,
            predictors.len(),
            ignored_columns.len()
        );

        Ok(InputSpec {
            response_column: response,
            training_frame: frame.id().to_string(),
            fold_column: fold,
            weights_column: weights,
            validation_frame: self.validation_frame.map(|f| f.id().to_string()),
            leaderboard_frame: self.leaderboard_frame.map(|f| f.id().to_string()),
            ignored_columns,
            predictors,
        })
    }
}

/// Fold and weights columns: indices are bounds-checked and resolved, names
/// are passed through for the server to check.
fn resolve_auxiliary_column(frame: &Frame, column: &ColumnRef) -> Result<String> {
    match column {
        ColumnRef::Index(_) => frame.resolve_column(column),
        ColumnRef::Name(name) => Ok(name.clone()),
    }
}

/// Resolve predictor references to unique names, keeping first-seen order.
fn unique_columns(frame: &Frame, columns: &[ColumnRef]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(columns.len());
    for column in columns {
        let name = frame.resolve_column(column)?;
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_only() {
        let frame = Frame::new("F", ["a", "b", "target"]);
        let spec = TrainRequest::new("target", &frame).input_spec().unwrap();

        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "response_column": "target",
                "training_frame": "F",
                "ignored_columns": []
            })
        );
        assert_eq!(spec.predictors, vec!["a", "b"]);
    }

    #[test]
    fn test_selected_predictors() {
        let frame = Frame::new("F", ["a", "b", "c", "target"]);
        let spec = TrainRequest::new("target", &frame).x(["a"]).input_spec().unwrap();
        assert_eq!(spec.ignored_columns, vec!["b", "c"]);
        assert_eq!(spec.predictors, vec!["a"]);
    }

    #[test]
    fn test_negative_response_index() {
        let frame = Frame::new("F", ["a", "b", "c"]);
        let spec = TrainRequest::new(-1, &frame).input_spec().unwrap();
        assert_eq!(spec.response_column, "c");
    }

    #[test]
    fn test_predictor_indices_are_deduplicated() {
        let frame = Frame::new("F", ["a", "b", "c", "target"]);
        let spec = TrainRequest::new("target", &frame)
            .x(vec![ColumnRef::from(1), ColumnRef::from("b"), ColumnRef::from(-4)])
            .input_spec()
            .unwrap();
        assert_eq!(spec.predictors, vec!["b", "a"]);
        assert_eq!(spec.ignored_columns, vec!["c"]);
    }

    #[test]
    fn test_fold_and_weights_never_ignored() {
        let frame = Frame::new("F", ["a", "b", "fold", "w", "target"]);
        let spec = TrainRequest::new("target", &frame)
            .x(["a"])
            .fold_column("fold")
            .weights_column(3)
            .input_spec()
            .unwrap();
        assert_eq!(spec.fold_column.as_deref(), Some("fold"));
        assert_eq!(spec.weights_column.as_deref(), Some("w"));
        assert_eq!(spec.ignored_columns, vec!["b"]);
    }

    #[test]
    fn test_selected_roles_are_not_predictors() {
        let frame = Frame::new("F", ["a", "b", "fold", "w", "target"]);
        let spec = TrainRequest::new("target", &frame)
            .x(["target", "a", "fold", "w"])
            .fold_column("fold")
            .weights_column("w")
            .input_spec()
            .unwrap();
        assert_eq!(spec.predictors, vec!["a"]);
        assert_eq!(spec.ignored_columns, vec!["b"]);
    }

    #[test]
    fn test_huge_unsigned_response_index() {
        let frame = Frame::new("F", ["a", "b", "target"]);
        let err = TrainRequest::new(usize::MAX, &frame).input_spec().unwrap_err();
        assert!(matches!(err, H2oAutoMLError::ColumnIndexOutOfBounds { ncols: 3, .. }));

        let err = TrainRequest::new("target", &frame)
            .x([usize::MAX])
            .input_spec()
            .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_fold_and_weights_excluded_from_implicit_predictors() {
        let frame = Frame::new("F", ["a", "fold", "w", "target"]);
        let spec = TrainRequest::new("target", &frame)
            .fold_column("fold")
            .weights_column("w")
            .input_spec()
            .unwrap();
        assert_eq!(spec.predictors, vec!["a"]);
        assert!(spec.ignored_columns.is_empty());
    }

    #[test]
    fn test_auxiliary_names_are_not_checked() {
        let frame = Frame::new("F", ["a", "target"]);
        let spec = TrainRequest::new("target", &frame)
            .weights_column("not_here")
            .input_spec()
            .unwrap();
        assert_eq!(spec.weights_column.as_deref(), Some("not_here"));

        let err = TrainRequest::new("target", &frame)
            .fold_column(7)
            .input_spec()
            .unwrap_err();
        assert!(matches!(err, H2oAutoMLError::ColumnIndexOutOfBounds { index: 7, .. }));
    }

    #[test]
    fn test_auxiliary_frames_transmit_ids() {
        let train = Frame::new("train", ["a", "target"]);
        let valid = Frame::new("valid", ["a", "target"]);
        let test = Frame::new("test", ["a", "target"]);
        let spec = TrainRequest::new("target", &train)
            .validation_frame(&valid)
            .leaderboard_frame(&test)
            .input_spec()
            .unwrap();
        assert_eq!(spec.validation_frame.as_deref(), Some("valid"));
        assert_eq!(spec.leaderboard_frame.as_deref(), Some("test"));
    }

    #[test]
    fn test_required_arguments() {
        let frame = Frame::new("F", ["a", "target"]);

        let err = TrainRequest::default().training_frame(&frame).input_spec().unwrap_err();
        assert!(matches!(err, H2oAutoMLError::MissingParameter { ref parameter, .. } if parameter == "y"));

        let err = TrainRequest::default().y("target").input_spec().unwrap_err();
        assert!(matches!(
            err,
            H2oAutoMLError::MissingParameter { ref parameter, .. } if parameter == "training_frame"
        ));
    }

    #[test]
    fn test_unknown_columns() {
        let frame = Frame::new("F", ["a", "target"]);
        let err = TrainRequest::new("label", &frame).input_spec().unwrap_err();
        assert!(matches!(err, H2oAutoMLError::ColumnNotFound { .. }));

        let err = TrainRequest::new("target", &frame).x(["a", "zz"]).input_spec().unwrap_err();
        assert!(err.to_string().contains("zz"));

        let err = TrainRequest::new(2, &frame).input_spec().unwrap_err();
        assert!(matches!(err, H2oAutoMLError::ColumnIndexOutOfBounds { index: 2, ncols: 2 }));
    }
}
