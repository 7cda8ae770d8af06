//! # vigil-engine
//!
//! The alert pipeline: load credentials, compose, probe, capture, deliver,
//! clean up. Frontends (the `vigil` binary today) build an
//! [`AlertPipeline`] from configuration and map its outcome to an exit code.

pub mod error;
pub mod pipeline;

pub use error::{EngineError, PipelineError};
pub use pipeline::{AlertPipeline, PipelineOutcome};
