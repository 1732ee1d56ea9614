//! Frame handles and training request validation.
//!
//! Frames live on the cluster; the client only keeps their key and schema,
//! which is enough to validate column references before submitting work.

pub mod frame;
pub mod input_spec;

pub use frame::Frame;
pub use input_spec::{InputSpec, TrainRequest};
