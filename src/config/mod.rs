//! Configuration for AutoML runs and for the cluster connection.
//!
//! - [`core`]: search budget and stopping settings, rendered into the
//!   `build_control` payload
//! - [`connection`]: cluster URL, credentials, timeouts and polling cadence

pub mod connection;
pub mod core;

pub use self::connection::{ConnectionConfig, PollConfig};
pub use self::core::{AutoMLConfig, AutoMLConfigBuilder, BuildControl, StoppingCriteria};
