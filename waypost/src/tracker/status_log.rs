//! Append-only file sink for recorded statuses.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::provider::StatusLog;
use crate::status::Status;

/// Status log writing one human-readable key/value line per status.
///
/// The file is opened in append mode on every write so an external log
/// rotation never leaves a stale handle behind. Failures are returned to
/// the caller, which treats them as best-effort.
#[derive(Debug, Clone)]
pub struct FileStatusLog {
    path: PathBuf,
}

impl FileStatusLog {
    /// Create a log writing to `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusLog for FileStatusLog {
    fn append(&self, status: &Status) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{status}")
    }
}
