//! AutoML budget configuration and its wire representation.
//!
//! [`AutoMLConfig`] is built once through [`AutoMLConfigBuilder`] and is
//! immutable afterward. [`AutoMLConfig::build_control`] renders it into the
//! nested `build_control` object expected by `POST /99/AutoMLBuilder`.

use crate::core::constants::*;
use crate::core::error::{H2oAutoMLError, Result};
use crate::core::types::StoppingMetric;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Search budget and stopping configuration for an AutoML run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoMLConfig {
    max_runtime_secs: u64,
    max_models: Option<u32>,
    stopping_metric: StoppingMetric,
    stopping_tolerance: f64,
    stopping_rounds: u32,
    seed: Option<i64>,
    project_name: Option<String>,
}

impl Default for AutoMLConfig {
    fn default() -> Self {
        AutoMLConfig {
            max_runtime_secs: DEFAULT_MAX_RUNTIME_SECS,
            max_models: None,
            stopping_metric: DEFAULT_STOPPING_METRIC,
            stopping_tolerance: DEFAULT_STOPPING_TOLERANCE,
            stopping_rounds: DEFAULT_STOPPING_ROUNDS,
            seed: None,
            project_name: None,
        }
    }
}

impl AutoMLConfig {
    /// Configuration with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder from the defaults.
    pub fn builder() -> AutoMLConfigBuilder {
        AutoMLConfigBuilder::new()
    }

    /// Wall-clock budget in seconds
    pub fn max_runtime_secs(&self) -> u64 {
        self.max_runtime_secs
    }

    /// Maximum number of models, if bounded
    pub fn max_models(&self) -> Option<u32> {
        self.max_models
    }

    /// Early-stopping metric
    pub fn stopping_metric(&self) -> StoppingMetric {
        self.stopping_metric
    }

    /// Relative improvement tolerance
    pub fn stopping_tolerance(&self) -> f64 {
        self.stopping_tolerance
    }

    /// Non-improving rounds before stopping
    pub fn stopping_rounds(&self) -> u32 {
        self.stopping_rounds
    }

    /// Random seed, if set
    pub fn seed(&self) -> Option<i64> {
        self.seed
    }

    /// User-supplied project name, if set
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// Whether the server will stop on model count or metric plateau rather
    /// than wall-clock time alone. Seeds only make runs reproducible when
    /// this holds.
    pub fn is_reproducible_budget(&self) -> bool {
        self.max_models.is_some() || self.stopping_rounds > 0
    }

    /// Validate every field.
    pub fn validate(&self) -> Result<()> {
        if let Some(max_models) = self.max_models {
            validate_max_models(max_models)?;
        }
        validate_stopping_tolerance(self.stopping_tolerance)?;
        if let Some(ref name) = self.project_name {
            validate_project_name(name)?;
        }
        Ok(())
    }

    /// Render the `build_control` payload.
    ///
    /// Runtime, metric, tolerance and rounds are always present; optional
    /// fields the user never set are omitted so the server applies its own
    /// defaults.
    pub fn build_control(&self) -> BuildControl {
        BuildControl {
            stopping_criteria: StoppingCriteria {
                max_runtime_secs: self.max_runtime_secs,
                stopping_metric: self.stopping_metric,
                stopping_tolerance: self.stopping_tolerance,
                stopping_rounds: self.stopping_rounds,
                max_models: self.max_models,
                seed: self.seed,
            },
            project_name: self.project_name.clone(),
        }
    }

    /// Load a configuration from a `.toml` or `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| H2oAutoMLError::config(format!("Failed to read config file: {}", e)))?;

        let config: AutoMLConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                H2oAutoMLError::config(format!("Failed to parse JSON config: {}", e))
            })?,
            Some("toml") => toml::from_str(&content).map_err(|e| {
                H2oAutoMLError::config(format!("Failed to parse TOML config: {}", e))
            })?,
            _ => {
                return Err(H2oAutoMLError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a `.toml` or `.json` file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self).map_err(|e| {
                H2oAutoMLError::config(format!("Failed to serialize to JSON: {}", e))
            })?,
            Some("toml") => toml::to_string_pretty(self).map_err(|e| {
                H2oAutoMLError::config(format!("Failed to serialize to TOML: {}", e))
            })?,
            _ => {
                return Err(H2oAutoMLError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| H2oAutoMLError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

fn validate_max_models(max_models: u32) -> Result<()> {
    if max_models == 0 {
        return Err(H2oAutoMLError::invalid_parameter(
            "max_models",
            max_models.to_string(),
            "must be at least 1 when set",
        ));
    }
    Ok(())
}

fn validate_stopping_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(H2oAutoMLError::invalid_parameter(
            "stopping_tolerance",
            tolerance.to_string(),
            "must be a finite, non-negative number",
        ));
    }
    Ok(())
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(H2oAutoMLError::invalid_parameter(
            "project_name",
            name,
            "must not be empty",
        ));
    }
    Ok(())
}

/// `build_control` object of the AutoML builder request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildControl {
    /// Budget and early-stopping settings
    pub stopping_criteria: StoppingCriteria,
    /// Project to create or extend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

/// `build_control.stopping_criteria` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoppingCriteria {
    /// Wall-clock budget in seconds
    pub max_runtime_secs: u64,
    /// Early-stopping metric
    pub stopping_metric: StoppingMetric,
    /// Relative improvement tolerance
    pub stopping_tolerance: f64,
    /// Non-improving rounds before stopping
    pub stopping_rounds: u32,
    /// Model count budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_models: Option<u32>,
    /// Random seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

/// Builder for [`AutoMLConfig`].
///
/// Setters record validation failures instead of panicking; [`build`]
/// reports them all and produces nothing if any were recorded.
///
/// [`build`]: AutoMLConfigBuilder::build
#[derive(Debug)]
pub struct AutoMLConfigBuilder {
    config: AutoMLConfig,
    validation_errors: Vec<H2oAutoMLError>,
}

impl AutoMLConfigBuilder {
    /// Create a builder seeded with the defaults
    pub fn new() -> Self {
        AutoMLConfigBuilder {
            config: AutoMLConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the wall-clock budget in seconds
    pub fn max_runtime_secs(mut self, secs: u64) -> Self {
        self.config.max_runtime_secs = secs;
        self
    }

    /// Bound the number of models built (excluding stacked ensembles)
    pub fn max_models(mut self, max_models: u32) -> Self {
        if let Err(e) = validate_max_models(max_models) {
            self.validation_errors.push(e);
        }
        self.config.max_models = Some(max_models);
        self
    }

    /// Set the early-stopping metric
    pub fn stopping_metric(mut self, metric: StoppingMetric) -> Self {
        self.config.stopping_metric = metric;
        self
    }

    /// Set the early-stopping metric from its wire name, e.g. `"rmse"`
    pub fn stopping_metric_str(mut self, metric: &str) -> Self {
        match metric.parse::<StoppingMetric>() {
            Ok(metric) => self.config.stopping_metric = metric,
            Err(e) => self.validation_errors.push(e),
        }
        self
    }

    /// Set the relative improvement tolerance
    pub fn stopping_tolerance(mut self, tolerance: f64) -> Self {
        if let Err(e) = validate_stopping_tolerance(tolerance) {
            self.validation_errors.push(e);
        }
        self.config.stopping_tolerance = tolerance;
        self
    }

    /// Set the number of non-improving rounds; 0 disables early stopping
    pub fn stopping_rounds(mut self, rounds: u32) -> Self {
        self.config.stopping_rounds = rounds;
        self
    }

    /// Set the random seed
    pub fn seed(mut self, seed: i64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Name the project to create or extend
    pub fn project_name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        if let Err(e) = validate_project_name(&name) {
            self.validation_errors.push(e);
        }
        self.config.project_name = Some(name);
        self
    }

    /// Build the configuration
    pub fn build(mut self) -> Result<AutoMLConfig> {
        match self.validation_errors.len() {
            0 => {}
            1 => return Err(self.validation_errors.remove(0)),
            _ => {
                let messages: Vec<String> =
                    self.validation_errors.iter().map(|e| e.to_string()).collect();
                return Err(H2oAutoMLError::config(format!(
                    "Configuration validation failed: {}",
                    messages.join("; ")
                )));
            }
        }

        self.config.validate()?;
        if self.config.seed.is_some() && !self.config.is_reproducible_budget() {
            log::warn!(
                "seed is set but the run is bounded only by max_runtime_secs; \
                 results are not guaranteed to be reproducible"
            );
        }
        Ok(self.config)
    }
}

impl Default for AutoMLConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_default() {
        let config = AutoMLConfig::default();
        assert_eq!(config.max_runtime_secs(), 3600);
        assert_eq!(config.max_models(), None);
        assert_eq!(config.stopping_metric(), StoppingMetric::Auto);
        assert_eq!(config.stopping_tolerance(), 0.001);
        assert_eq!(config.stopping_rounds(), 3);
        assert_eq!(config.seed(), None);
        assert_eq!(config.project_name(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_build_control_omits_optional_fields() {
        let value = serde_json::to_value(AutoMLConfig::default().build_control()).unwrap();
        assert_eq!(
            value,
            json!({
                "stopping_criteria": {
                    "max_runtime_secs": 3600,
                    "stopping_metric": "AUTO",
                    "stopping_tolerance": 0.001,
                    "stopping_rounds": 3
                }
            })
        );
    }

    #[test]
    fn test_full_build_control() {
        let config = AutoMLConfig::builder()
            .max_runtime_secs(30)
            .max_models(10)
            .stopping_metric(StoppingMetric::Rmse)
            .stopping_tolerance(0.01)
            .stopping_rounds(0)
            .seed(42)
            .project_name("churn")
            .build()
            .unwrap();

        let value = serde_json::to_value(config.build_control()).unwrap();
        assert_eq!(
            value,
            json!({
                "stopping_criteria": {
                    "max_runtime_secs": 30,
                    "stopping_metric": "rmse",
                    "stopping_tolerance": 0.01,
                    "stopping_rounds": 0,
                    "max_models": 10,
                    "seed": 42
                },
                "project_name": "churn"
            })
        );
    }

    #[test]
    fn test_builder_rejects_bad_fields() {
        let err = AutoMLConfig::builder().stopping_tolerance(-1.0).build().unwrap_err();
        match err {
            H2oAutoMLError::InvalidParameter { parameter, .. } => {
                assert_eq!(parameter, "stopping_tolerance")
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = AutoMLConfig::builder().stopping_metric_str("f1").build().unwrap_err();
        assert!(err.to_string().contains("stopping_metric"));

        let err = AutoMLConfig::builder()
            .max_models(0)
            .project_name("  ")
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("max_models"));
        assert!(message.contains("project_name"));
    }

    #[test]
    fn test_builder_accepts_metric_names() {
        let config = AutoMLConfig::builder()
            .stopping_metric_str("mean_per_class_error")
            .build()
            .unwrap();
        assert_eq!(config.stopping_metric(), StoppingMetric::MeanPerClassError);
    }

    #[test]
    fn test_reproducible_budget() {
        assert!(AutoMLConfig::default().is_reproducible_budget());
        let config = AutoMLConfig::builder().stopping_rounds(0).build().unwrap();
        assert!(!config.is_reproducible_budget());
        let config = AutoMLConfig::builder()
            .stopping_rounds(0)
            .max_models(5)
            .build()
            .unwrap();
        assert!(config.is_reproducible_budget());
    }
}
