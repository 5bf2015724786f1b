use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::domain::JobId;

/// Exclusive scratch directory for one phase of one job.
///
/// The directory is removed when the workspace is dropped, so every exit
/// path (including unwinding) cleans up. Removal failures are logged and
/// swallowed.
pub struct JobWorkspace {
    dir: TempDir,
}

impl JobWorkspace {
    pub fn create(root: &Path, job_id: &JobId, phase: &str) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("nativity_{}_{}_", phase, job_id.short()))
            .tempdir_in(root)?;
        tracing::debug!(path = %dir.path().display(), "Job workspace created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove job workspace");
        }
    }
}
