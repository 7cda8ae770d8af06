//! Pipeline state machine.
//!
//! ```text
//! LoadingConfig -> CheckingConnectivity -> [CapturingEvidence] -> Delivering -> Cleanup
//!       |                  |
//!       +------------------+--> Failed
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    LoadingConfig,
    CheckingConnectivity,
    CapturingEvidence,
    Delivering,
    Cleanup,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Cleanup | PipelineState::Failed)
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (LoadingConfig, CheckingConnectivity)
                | (LoadingConfig, Failed)
                | (CheckingConnectivity, CapturingEvidence)
                | (CheckingConnectivity, Delivering)
                | (CheckingConnectivity, Failed)
                | (CapturingEvidence, Delivering)
                | (Delivering, Cleanup)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::LoadingConfig => "LOADING_CONFIG",
            PipelineState::CheckingConnectivity => "CHECKING_CONNECTIVITY",
            PipelineState::CapturingEvidence => "CAPTURING_EVIDENCE",
            PipelineState::Delivering => "DELIVERING",
            PipelineState::Cleanup => "CLEANUP",
            PipelineState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}
