use thiserror::Error;
use vigil_delivery::DeliveryError;

/// Why a pipeline run ended without a delivered alert.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Telegram credentials missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Internet offline - cannot send alert")]
    Unreachable,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Failure to assemble the production pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot set up delivery: {0}")]
    Setup(#[from] DeliveryError),
}
