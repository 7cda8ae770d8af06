//! Evidence files and the sources that produce them.

use std::io;
use std::path::{Path, PathBuf};

/// A captured image owned by the invocation that created it.
#[derive(Debug, PartialEq, Eq)]
pub struct Evidence {
    path: PathBuf,
    size: u64,
}

impl Evidence {
    pub fn new(path: PathBuf, size: u64) -> Self {
        Evidence { path, size }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Delete the image. A file that is already gone counts as deleted.
    pub fn discard(self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Best-effort source of evidence. `None` is an ordinary outcome (no
/// camera, busy device, corrupt capture), not an error.
pub trait EvidenceSource {
    fn capture(&self) -> Option<Evidence>;
}
