use super::templates::WORKDIR_PREFIX;
use crate::engine::config::WorkdirPolicy;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated directory owned by exactly one connect job.
///
/// Under [`WorkdirPolicy::Temporary`] the directory is removed when this value is dropped
/// unless [`WorkDir::preserve`] was called first.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    guard: Option<TempDir>,
}

impl WorkDir {
    /// Creates a fresh, uniquely named directory under `root` (or the system temp dir).
    pub fn allocate(root: Option<&Path>, policy: WorkdirPolicy) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKDIR_PREFIX);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let mut workdir = Self {
            path: dir.path().to_path_buf(),
            guard: Some(dir),
        };
        if policy == WorkdirPolicy::Keep {
            workdir.preserve();
        }
        Ok(workdir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Disarms removal; the directory outlives this value.
    pub fn preserve(&mut self) -> &Path {
        if let Some(guard) = self.guard.take() {
            self.path = guard.keep();
        }
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.guard.is_some()
    }

    /// Consumes the handle, leaving the directory on disk.
    pub fn into_path(mut self) -> PathBuf {
        self.preserve();
        self.path
    }
}
