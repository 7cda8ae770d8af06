use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use tempfile::TempDir;
use tracing_test::traced_test;
use vigil_capture::{CameraCapturer, Evidence, EvidenceSource};
use vigil_config::{CaptureConfig, CredentialStore, Credentials, FileCredentialStore};
use vigil_core::{AlertMessage, EventKind, PipelineState};
use vigil_delivery::{AlertSender, ConnectivityProbe, DeliveryError, DeliveryMode, ProbeError};

use super::*;

struct FixedCredentials(Credentials);

impl CredentialStore for FixedCredentials {
    fn load(&self) -> Credentials {
        self.0.clone()
    }
}

#[derive(Clone, Copy)]
enum ProbeResult {
    Reachable,
    TimedOut,
}

struct FakeProbe {
    result: ProbeResult,
    calls: Rc<Cell<usize>>,
}

impl ConnectivityProbe for FakeProbe {
    fn probe(&self) -> Result<(), ProbeError> {
        self.calls.set(self.calls.get() + 1);
        match self.result {
            ProbeResult::Reachable => Ok(()),
            ProbeResult::TimedOut => Err(ProbeError::Timeout {
                host: "https://api.telegram.org".into(),
                timeout: Duration::from_secs(3),
            }),
        }
    }
}

/// Writes an image of `size` bytes into the scratch dir, or nothing.
struct FakeCamera {
    dir: PathBuf,
    size: Option<usize>,
    calls: Rc<Cell<usize>>,
}

impl EvidenceSource for FakeCamera {
    fn capture(&self) -> Option<Evidence> {
        self.calls.set(self.calls.get() + 1);
        let size = self.size?;
        let path = self.dir.join("login_20240101_000000_1.jpg");
        std::fs::write(&path, vec![0xFF; size]).ok()?;
        Some(Evidence::new(path, size as u64))
    }
}

#[derive(Debug, Clone)]
struct Delivery {
    mode: DeliveryMode,
    text: String,
    evidence: Option<PathBuf>,
}

struct FakeSender {
    status: u16,
    deliveries: Rc<RefCell<Vec<Delivery>>>,
}

impl AlertSender for FakeSender {
    fn deliver(
        &self,
        _credentials: &Credentials,
        message: &AlertMessage,
        evidence: Option<&Path>,
    ) -> Result<DeliveryMode, DeliveryError> {
        let photo = evidence.filter(|p| p.exists());
        let mode = if photo.is_some() {
            DeliveryMode::Photo
        } else {
            DeliveryMode::Text
        };
        self.deliveries.borrow_mut().push(Delivery {
            mode,
            text: message.text().to_string(),
            evidence: photo.map(Path::to_path_buf),
        });
        if self.status == 200 {
            Ok(mode)
        } else {
            Err(DeliveryError::Api {
                status: self.status,
                description: "Internal Server Error".into(),
            })
        }
    }
}

struct Harness {
    scratch: TempDir,
    credentials: Credentials,
    probe: ProbeResult,
    image_size: Option<usize>,
    status: u16,
    probe_calls: Rc<Cell<usize>>,
    capture_calls: Rc<Cell<usize>>,
    deliveries: Rc<RefCell<Vec<Delivery>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            scratch: tempfile::tempdir().unwrap(),
            credentials: Credentials::new("123:abc", "42"),
            probe: ProbeResult::Reachable,
            image_size: None,
            status: 200,
            probe_calls: Rc::default(),
            capture_calls: Rc::default(),
            deliveries: Rc::default(),
        }
    }

    fn probe_box(&self) -> Box<FakeProbe> {
        Box::new(FakeProbe {
            result: self.probe,
            calls: self.probe_calls.clone(),
        })
    }

    fn sender_box(&self) -> Box<FakeSender> {
        Box::new(FakeSender {
            status: self.status,
            deliveries: self.deliveries.clone(),
        })
    }

    fn pipeline(&self) -> AlertPipeline {
        AlertPipeline::new(
            Box::new(FixedCredentials(self.credentials.clone())),
            self.probe_box(),
            Box::new(FakeCamera {
                dir: self.scratch.path().to_path_buf(),
                size: self.image_size,
                calls: self.capture_calls.clone(),
            }),
            self.sender_box(),
        )
        .with_host("bastion")
    }

    fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path())
            .unwrap()
            .next()
            .is_none()
    }
}

#[test]
fn startup_sends_text_without_capture() {
    let harness = Harness::new();
    let outcome = harness.pipeline().run("root", EventKind::Startup);

    assert!(outcome.is_delivered());
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.state, PipelineState::Cleanup);
    assert_eq!(outcome.mode, Some(DeliveryMode::Text));
    assert_eq!(harness.capture_calls.get(), 0);

    let deliveries = harness.deliveries.borrow();
    assert_eq!(deliveries.len(), 1);
    assert!(deliveries[0].text.contains("SYSTEM STARTED"));
    assert!(deliveries[0].text.contains("🟢"));
    assert!(deliveries[0].text.contains("bastion"));
}

#[test]
fn failed_login_without_cameras_falls_back_to_text() {
    let harness = Harness::new();
    let scratch = harness.scratch.path();
    let camera = CameraCapturer::new(&CaptureConfig {
        devices: vec![scratch.join("video0"), scratch.join("video1")],
        tool: scratch.join("never-run").display().to_string(),
        scratch_dir: scratch.join("photos"),
        ..CaptureConfig::default()
    });
    let pipeline = AlertPipeline::new(
        Box::new(FixedCredentials(harness.credentials.clone())),
        harness.probe_box(),
        Box::new(camera),
        harness.sender_box(),
    )
    .with_host("bastion");

    let outcome = pipeline.run("mallory", EventKind::parse("failed"));

    assert_eq!(outcome.exit_code(), 0);
    assert!(!outcome.evidence_captured);
    let deliveries = harness.deliveries.borrow();
    assert_eq!(deliveries[0].mode, DeliveryMode::Text);
    assert!(deliveries[0].evidence.is_none());
    assert!(deliveries[0].text.contains("LOGIN FAILED"));
    assert!(deliveries[0].text.starts_with("🚨"));
}

#[test]
fn failed_login_exit_code_follows_delivery() {
    let mut harness = Harness::new();
    harness.status = 403;
    let outcome = harness.pipeline().run("mallory", EventKind::Failed);

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.state, PipelineState::Cleanup);
    assert!(matches!(outcome.error, Some(PipelineError::Delivery(_))));
    assert_eq!(harness.capture_calls.get(), 1);
}

#[traced_test]
#[test]
fn missing_chat_id_stops_before_any_io() {
    let mut harness = Harness::new();
    harness.image_size = Some(50 * 1024);
    let config = harness.scratch.path().join("config.json");
    std::fs::write(&config, r#"{"telegram_token": "123:abc"}"#).unwrap();
    let pipeline = AlertPipeline::new(
        Box::new(FileCredentialStore::new(&config)),
        harness.probe_box(),
        Box::new(FakeCamera {
            dir: harness.scratch.path().to_path_buf(),
            size: harness.image_size,
            calls: harness.capture_calls.clone(),
        }),
        harness.sender_box(),
    );

    let outcome = pipeline.run("alice", EventKind::Success);

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.state, PipelineState::Failed);
    assert!(matches!(
        &outcome.error,
        Some(PipelineError::MissingCredentials(fields)) if fields == &vec!["telegram_chat_id"]
    ));
    assert_eq!(harness.probe_calls.get(), 0);
    assert_eq!(harness.capture_calls.get(), 0);
    assert!(harness.deliveries.borrow().is_empty());
    assert!(logs_contain("Telegram credentials missing: telegram_chat_id"));
}

#[test]
fn empty_credentials_never_deliver() {
    let mut harness = Harness::new();
    harness.credentials = Credentials::default();
    let outcome = harness.pipeline().run("alice", EventKind::Startup);

    assert!(!outcome.is_delivered());
    assert!(harness.deliveries.borrow().is_empty());
}

#[traced_test]
#[test]
fn probe_timeout_skips_capture_and_delivery() {
    let mut harness = Harness::new();
    harness.probe = ProbeResult::TimedOut;
    harness.image_size = Some(50 * 1024);

    let outcome = harness.pipeline().run("alice", EventKind::Success);

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.state, PipelineState::Failed);
    assert!(matches!(outcome.error, Some(PipelineError::Unreachable)));
    assert_eq!(harness.probe_calls.get(), 1);
    assert_eq!(harness.capture_calls.get(), 0);
    assert!(harness.deliveries.borrow().is_empty());
    assert!(harness.scratch_is_empty());
    assert!(logs_contain("Internet offline - cannot send alert"));
    assert!(!logs_contain("Security alert delivered"));
}

#[traced_test]
#[test]
fn rejected_photo_is_still_cleaned_up() {
    let mut harness = Harness::new();
    harness.image_size = Some(50 * 1024);
    harness.status = 500;

    let outcome = harness.pipeline().run("alice", EventKind::Success);

    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.evidence_captured);
    assert!(matches!(
        outcome.error,
        Some(PipelineError::Delivery(DeliveryError::Api { status: 500, .. }))
    ));

    let deliveries = harness.deliveries.borrow();
    assert_eq!(deliveries[0].mode, DeliveryMode::Photo);
    let photo = deliveries[0].evidence.clone().unwrap();
    assert!(!photo.exists());
    assert!(harness.scratch_is_empty());
    assert!(logs_contain("Telegram API error (HTTP 500)"));
}

#[traced_test]
#[test]
fn delivery_failure_is_logged_even_if_sender_is_silent() {
    let mut harness = Harness::new();
    harness.status = 502;

    let outcome = harness.pipeline().run("alice", EventKind::Startup);

    assert_eq!(outcome.exit_code(), 1);
    logs_assert(|lines: &[&str]| {
        let errors = lines
            .iter()
            .filter(|line| line.contains("ERROR") && line.contains("Telegram API error (HTTP 502)"))
            .count();
        match errors {
            1 => Ok(()),
            n => Err(format!("expected one error line for the rejected alert, found {n}")),
        }
    });
}

#[test]
fn delivered_photo_is_cleaned_up() {
    let mut harness = Harness::new();
    harness.image_size = Some(50 * 1024);

    let outcome = harness.pipeline().run("alice", EventKind::Success);

    assert_eq!(outcome.mode, Some(DeliveryMode::Photo));
    assert!(harness.scratch_is_empty());
}

#[test]
fn unknown_kinds_never_capture() {
    for raw in ["logout", "", "sudo", "OTHER"] {
        let mut harness = Harness::new();
        harness.image_size = Some(50 * 1024);

        let outcome = harness.pipeline().run("alice", EventKind::parse(raw));

        assert!(outcome.is_delivered(), "{raw}");
        assert_eq!(harness.capture_calls.get(), 0, "{raw}");
        let deliveries = harness.deliveries.borrow();
        assert!(deliveries[0].text.contains("UNKNOWN EVENT"));
        assert!(deliveries[0].text.starts_with("⚠️"));
    }
}

#[test]
fn production_wiring_builds_from_defaults() {
    let config = vigil_config::AgentConfig::default();
    assert!(AlertPipeline::from_config(&config, "/nonexistent/config.json").is_ok());
}
