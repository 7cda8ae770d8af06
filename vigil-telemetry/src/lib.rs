//! # Vigil Telemetry
//!
//! Logging setup for the `vigil` binary and the audit record emitted once
//! per alert. Library crates only use `tracing` macros; installing the
//! subscriber is left to the binary.

pub mod logging;

pub use logging::{EventLogger, LogFormat};
