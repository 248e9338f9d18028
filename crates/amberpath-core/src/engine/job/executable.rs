use crate::engine::error::SpawnError;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// The process boundary: given a populated working directory, run the path search there.
///
/// Implementations block until the search finishes. No timeout is imposed.
pub trait ConnectEngine: Send + Sync {
    fn executable(&self) -> &Path;

    /// Runs the engine in `workdir`, writing its standard output to `log_path`.
    fn run(&self, workdir: &Path, log_path: &Path) -> Result<ExitStatus, SpawnError>;
}

/// An engine binary on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalExecutable {
    path: PathBuf,
}

impl ExternalExecutable {
    /// Relative paths with a directory component are anchored at the current directory, since
    /// the process is started from inside the working directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = if path.is_relative() && path.components().count() > 1 {
            std::path::absolute(&path).unwrap_or(path)
        } else {
            path
        };
        Self { path }
    }

    /// Expands `~` and environment references in a configured path.
    pub fn from_config_value(raw: &str) -> Self {
        Self::new(expand_path_with(raw, |name| std::env::var(name).ok()))
    }
}

impl ConnectEngine for ExternalExecutable {
    fn executable(&self) -> &Path {
        &self.path
    }

    fn run(&self, workdir: &Path, log_path: &Path) -> Result<ExitStatus, SpawnError> {
        let launch_error = |source| SpawnError::Launch {
            executable: self.path.clone(),
            workdir: workdir.to_path_buf(),
            source,
        };

        info!("Launching {:?} in {:?}.", self.path, workdir);
        let log = File::create(log_path).map_err(launch_error)?;
        let output = Command::new(&self.path)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::piped())
            .output()
            .map_err(launch_error)?;

        if !output.status.success() {
            return Err(SpawnError::AbnormalExit {
                executable: self.path.clone(),
                workdir: workdir.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        debug!("{:?} exited with {}.", self.path, output.status);
        Ok(output.status)
    }
}

/// Expands a leading `~` and `$NAME` / `${NAME}` references using `lookup`.
///
/// `~` resolves through the `HOME` variable. Unknown variables are left untouched.
pub fn expand_path_with<F>(raw: &str, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    if let Some(after) = rest.strip_prefix('~') {
        if after.is_empty() || after.starts_with('/') {
            match lookup("HOME") {
                Some(home) => out.push_str(&home),
                None => out.push('~'),
            }
            rest = after;
        }
    }

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let (name, consumed) = if let Some(braced) = tail.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = tail
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(tail.len());
            (&tail[..end], end)
        };

        match (name.is_empty(), lookup(name)) {
            (false, Some(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    PathBuf::from(out)
}
