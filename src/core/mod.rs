//! Core infrastructure module for the H2O AutoML client.
//!
//! # Organization
//!
//! - [`types`]: stopping metrics, column references and job states
//! - [`constants`]: defaults and REST endpoint paths
//! - [`error`]: the crate-wide error type
//!
//! ```rust
//! use h2o_automl::core::{
//!     types::{ColumnRef, StoppingMetric},
//!     constants::DEFAULT_MAX_RUNTIME_SECS,
//!     error::{Result, H2oAutoMLError},
//! };
//!
//! let metric: StoppingMetric = "rmse".parse()?;
//! let response = ColumnRef::from(-1);
//! assert_eq!(DEFAULT_MAX_RUNTIME_SECS, 3600);
//! # let _ = (metric, response);
//! # Ok::<(), H2oAutoMLError>(())
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{H2oAutoMLError, Result};
pub use types::*;

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Install `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
///
/// Safe to call repeatedly; only the first call has an effect, and an
/// already-installed logger from the host application is left alone.
pub(crate) fn initialize_logging() {
    LOGGING_INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        let _ = env_logger::Builder::from_env(env).try_init();
        log::debug!("h2o-automl {} logging initialized", H2O_AUTOML_VERSION);
    });
}

/// Whether [`initialize_logging`] has run.
pub(crate) fn is_logging_initialized() -> bool {
    LOGGING_INIT.is_completed()
}
