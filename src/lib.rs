//! # H2O AutoML client
//!
//! An asynchronous Rust client for the AutoML service of an
//! [H2O](https://h2o.ai) cluster. The model search itself (training,
//! ensembling, stopping rules) runs on the server; this crate validates
//! requests, submits runs, waits for them and exposes their results.
//!
//! ## Features
//!
//! - **Validated configuration**: search budgets are built once through a
//!   checked builder, and options left unset are omitted from the wire
//!   payload so the server applies its own defaults.
//! - **Early schema checks**: column references (names or negative/positive
//!   indices) are resolved against the training frame before any request.
//! - **Async jobs**: runs are futures with explicit handles, status
//!   snapshots and cancellation, plus a blocking convenience.
//! - **DataFrame leaderboards**: leaderboards are materialized as Polars
//!   DataFrames.
//! - **Typed errors**: submission failures, job failures and the absence of
//!   a trained model are distinct error variants.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use h2o_automl::{AutoML, AutoMLConfig, ConnectionConfig, H2oClient, StoppingMetric, TrainRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! h2o_automl::init()?;
//!
//! let client = H2oClient::connect(&ConnectionConfig::load_from_environment()?)?;
//! let config = AutoMLConfig::builder()
//!     .max_runtime_secs(600)
//!     .max_models(20)
//!     .stopping_metric(StoppingMetric::Auc)
//!     .seed(42)
//!     .build()?;
//!
//! let mut automl = AutoML::new(client.clone(), config).await;
//! let train = client.frame("train.hex").await?;
//! let test = client.frame("test.hex").await?;
//!
//! automl.train(&TrainRequest::new("response", &train).x(["x1", "x2", "x3"])).await?;
//!
//! if let Some(leaderboard) = automl.leaderboard() {
//!     println!("{}", leaderboard.table());
//! }
//! let predictions = automl.predict(&test).await?;
//! println!("predictions in frame {}", predictions.id());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error type, constants and shared enums
//! - [`config`]: run budgets and connection settings
//! - [`dataset`]: frame handles and training request validation
//! - [`client`]: transport seam and typed REST calls
//! - [`job`]: job handles and the poll loop
//! - [`automl`]: the [`AutoML`] facade, leaderboards and models

#![doc(html_root_url = "https://docs.rs/h2o-automl/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Frame handles and request validation
pub mod dataset;

// REST client and transport
pub mod client;

// Remote job handling
pub mod job;

// AutoML facade
pub mod automl;

// Re-export core functionality for convenience
pub use core::{
    constants::*,
    error::{H2oAutoMLError, Result},
    types::*,
};

// Re-export configuration functionality
pub use config::{
    AutoMLConfig, AutoMLConfigBuilder, BuildControl, ConnectionConfig, PollConfig,
    StoppingCriteria,
};

// Re-export dataset functionality
pub use dataset::{Frame, InputSpec, TrainRequest};

// Re-export client functionality
pub use client::{H2oClient, HttpTransport, Method, Transport};

// Re-export job functionality
pub use job::{JobHandle, JobStatus};

// Re-export AutoML functionality
pub use automl::{AutoML, Leaderboard, Model};

// Version information
pub use core::constants::H2O_AUTOML_VERSION as VERSION;

/// Initialize the library.
///
/// Installs an `env_logger` logger (level `info` unless `RUST_LOG` says
/// otherwise). Applications that install their own `log` backend can skip
/// this.
///
/// # Examples
///
/// ```rust
/// fn main() -> h2o_automl::Result<()> {
///     h2o_automl::init()?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    core::initialize_logging();
    Ok(())
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    core::is_logging_initialized()
}
