use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{debug, error, info, instrument, warn};
use vigil_config::CaptureConfig;
use vigil_core::select::CandidateList;

use crate::error::CaptureError;
use crate::evidence::{Evidence, EvidenceSource};

/// How often a running capture tool is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captures a still image from the first present camera device.
#[derive(Debug, Clone)]
pub struct CameraCapturer {
    devices: CandidateList<PathBuf>,
    tool: String,
    resolution: String,
    timeout: Duration,
    scratch_dir: PathBuf,
    min_size: u64,
}

impl CameraCapturer {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            devices: CandidateList::new(config.devices.iter().cloned()),
            tool: config.tool.clone(),
            resolution: config.resolution.clone(),
            timeout: config.timeout(),
            scratch_dir: config.scratch_dir.clone(),
            min_size: config.min_size,
        }
    }

    /// `login_<timestamp>_<pid>.jpg`; the pid keeps overlapping invocations
    /// within the same second apart.
    fn output_path(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        self.scratch_dir
            .join(format!("login_{timestamp}_{}.jpg", std::process::id()))
    }

    fn prepare_scratch_dir(&self) -> Result<(), CaptureError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder
            .create(&self.scratch_dir)
            .map_err(|source| CaptureError::ScratchDir {
                path: self.scratch_dir.clone(),
                source,
            })
    }

    /// One attempt on one device. On error the output may be partially
    /// written; the caller removes it.
    fn try_device(&self, device: &Path, output: &Path) -> Result<Evidence, CaptureError> {
        let status = self.run_tool(device, output)?;
        if !status.success() {
            return Err(CaptureError::ExitStatus(status));
        }

        let size = match fs::metadata(output) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CaptureError::MissingOutput)
            }
            Err(e) => return Err(e.into()),
        };
        if size <= self.min_size {
            return Err(CaptureError::Undersized {
                size,
                min: self.min_size,
            });
        }
        Ok(Evidence::new(output.to_path_buf(), size))
    }

    fn run_tool(&self, device: &Path, output: &Path) -> Result<ExitStatus, CaptureError> {
        let mut child = Command::new(&self.tool)
            .arg("-d")
            .arg(device)
            .arg("-r")
            .arg(&self.resolution)
            .arg("--no-banner")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CaptureError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    reap(&mut child);
                    return Err(CaptureError::Timeout(self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    reap(&mut child);
                    return Err(e.into());
                }
            }
        }
    }
}

/// Kill and wait so no zombie outlives the attempt.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Capture tool already exited: {e}");
    }
    let _ = child.wait();
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed partial capture"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!(path = %path.display(), "Failed to remove partial capture: {e}"),
    }
}

impl EvidenceSource for CameraCapturer {
    #[instrument(level = "debug", skip_all, fields(tool = %self.tool))]
    fn capture(&self) -> Option<Evidence> {
        if let Err(e) = self.prepare_scratch_dir() {
            error!("Evidence capture skipped: {e}");
            return None;
        }

        let output = self.output_path();
        info!("Capturing evidence");
        let evidence = self
            .devices
            .first_responsive(|device| match self.try_device(device, &output) {
                Ok(evidence) => Some(evidence),
                Err(e) => {
                    warn!(device = %device.display(), "Capture attempt failed: {e}");
                    remove_partial(&output);
                    None
                }
            });

        match &evidence {
            Some(evidence) => info!(
                path = %evidence.path().display(),
                size = evidence.size(),
                "Evidence captured"
            ),
            None => warn!("Could not capture evidence"),
        }
        evidence
    }
}
