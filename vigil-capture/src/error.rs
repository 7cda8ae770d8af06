use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Why a single capture attempt on one device produced no evidence. These
/// never leave the capturer; they are logged and the next device is tried.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot create scratch directory {}: {source}", path.display())]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("capture tool did not finish within {0:?}")]
    Timeout(Duration),

    #[error("capture tool exited with {0}")]
    ExitStatus(ExitStatus),

    #[error("capture tool reported success but wrote no file")]
    MissingOutput,

    #[error("captured image is {size} bytes, expected more than {min}")]
    Undersized { size: u64, min: u64 },

    #[error("I/O error during capture: {0}")]
    Io(#[from] std::io::Error),
}
