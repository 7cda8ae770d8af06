//! Pipeline orchestration - sequences credential loading, composition,
//! connectivity, evidence capture and delivery for one login event.

use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, error, info, instrument, warn};

use vigil_capture::{CameraCapturer, Evidence, EvidenceSource};
use vigil_config::{AgentConfig, CredentialStore, FileCredentialStore};
use vigil_core::host::host_identity;
use vigil_core::{compose, EventKind, PipelineState};
use vigil_delivery::{AlertSender, ConnectivityProbe, DeliveryMode, HttpProbe, TelegramClient};
use vigil_telemetry::EventLogger;

use crate::error::{EngineError, PipelineError};

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Terminal state: `Cleanup` once delivery was attempted, else `Failed`.
    pub state: PipelineState,
    /// Set when the alert was delivered.
    pub mode: Option<DeliveryMode>,
    /// Set when it was not.
    pub error: Option<PipelineError>,
    /// Whether an evidence file was produced (and later discarded).
    pub evidence_captured: bool,
}

impl PipelineOutcome {
    pub fn is_delivered(&self) -> bool {
        self.mode.is_some()
    }

    /// `0` when delivered, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_delivered() {
            0
        } else {
            1
        }
    }
}

/// Walks the pipeline state machine, logging each edge.
struct Transitions {
    state: PipelineState,
}

impl Transitions {
    fn start() -> Self {
        debug!(state = %PipelineState::LoadingConfig, "Pipeline started");
        Self {
            state: PipelineState::LoadingConfig,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next;
    }

    fn fail(mut self, error: PipelineError) -> PipelineOutcome {
        self.advance(PipelineState::Failed);
        self.finish(Err(error), false)
    }

    fn finish(
        self,
        result: Result<DeliveryMode, PipelineError>,
        evidence_captured: bool,
    ) -> PipelineOutcome {
        debug_assert!(self.state.is_terminal(), "finished in {}", self.state);
        let (mode, error) = match result {
            Ok(mode) => (Some(mode), None),
            Err(e) => (None, Some(e)),
        };
        PipelineOutcome {
            state: self.state,
            mode,
            error,
            evidence_captured,
        }
    }
}

/// The alert delivery pipeline with its collaborators injected.
pub struct AlertPipeline {
    credentials: Box<dyn CredentialStore>,
    probe: Box<dyn ConnectivityProbe>,
    evidence: Box<dyn EvidenceSource>,
    sender: Box<dyn AlertSender>,
    host: Option<String>,
}

impl AlertPipeline {
    pub fn new(
        credentials: Box<dyn CredentialStore>,
        probe: Box<dyn ConnectivityProbe>,
        evidence: Box<dyn EvidenceSource>,
        sender: Box<dyn AlertSender>,
    ) -> Self {
        Self {
            credentials,
            probe,
            evidence,
            sender,
            host: None,
        }
    }

    /// Production wiring: credentials re-read from `config_path` on every
    /// run, HTTP probe and Telegram client, camera capture.
    pub fn from_config(
        config: &AgentConfig,
        config_path: impl Into<PathBuf>,
    ) -> Result<Self, EngineError> {
        Ok(Self::new(
            Box::new(FileCredentialStore::new(config_path)),
            Box::new(HttpProbe::new(&config.delivery)?),
            Box::new(CameraCapturer::new(&config.capture)),
            Box::new(TelegramClient::new(&config.delivery)?),
        ))
    }

    /// Use a fixed host identity instead of asking the OS.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Run the pipeline once. Never panics on external failures; the
    /// outcome says whether the alert went out.
    #[instrument(name = "login_alert", skip(self), fields(user = %username, kind = %kind))]
    pub fn run(&self, username: &str, kind: EventKind) -> PipelineOutcome {
        let outcome = self.execute(username, kind);
        let detail = match (&outcome.mode, &outcome.error) {
            (Some(mode), _) => mode.to_string(),
            (None, Some(e)) => e.to_string(),
            (None, None) => String::new(),
        };
        EventLogger::log_alert(kind.as_str(), username, outcome.is_delivered(), &detail);
        outcome
    }

    fn execute(&self, username: &str, kind: EventKind) -> PipelineOutcome {
        let mut transitions = Transitions::start();

        let credentials = self.credentials.load();
        if !credentials.is_complete() {
            let error = PipelineError::MissingCredentials(credentials.missing_fields());
            error!("{error}");
            return transitions.fail(error);
        }

        info!("Sending alert for {username} - {kind}");
        let host = self.host.clone().unwrap_or_else(host_identity);
        let message = compose(username, kind, &host, &Local::now());

        transitions.advance(PipelineState::CheckingConnectivity);
        if !self.probe.is_reachable() {
            let error = PipelineError::Unreachable;
            warn!("{error}");
            return transitions.fail(error);
        }

        let evidence = if kind.wants_evidence() {
            transitions.advance(PipelineState::CapturingEvidence);
            self.evidence.capture()
        } else {
            None
        };

        transitions.advance(PipelineState::Delivering);
        let delivered =
            self.sender
                .deliver(&credentials, &message, evidence.as_ref().map(Evidence::path));

        transitions.advance(PipelineState::Cleanup);
        let evidence_captured = evidence.is_some();
        if let Some(evidence) = evidence {
            discard(evidence);
        }

        let result = match delivered {
            Ok(mode) => {
                info!(%mode, "Alert sent successfully for {username}");
                Ok(mode)
            }
            Err(e) => {
                let error = PipelineError::from(e);
                error!("{error}");
                Err(error)
            }
        };
        transitions.finish(result, evidence_captured)
    }
}

/// Best-effort removal; failure is logged and never changes the outcome.
fn discard(evidence: Evidence) {
    let path = evidence.path().to_path_buf();
    match evidence.discard() {
        Ok(()) => debug!(path = %path.display(), "Evidence removed"),
        Err(e) => error!(path = %path.display(), "Failed to remove evidence: {e}"),
    }
}

#[cfg(test)]
mod tests;
