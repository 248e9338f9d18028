use super::config::ConfigError;
use crate::core::io::error::FormatError;
use crate::core::models::permutation::PermutationError;
use crate::core::topology::motifs::MotifError;
use crate::core::topology::permutations::PermutationLoadError;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure of a single connect job attempt. Every variant raised after allocation carries
/// the working directory, which is left on disk for inspection.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("Endpoint {endpoint} has {found} coordinate values; the topology requires {expected}")]
    CoordinateMismatch {
        endpoint: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Permutation groups do not fit the topology: {source}")]
    Permutation {
        #[from]
        source: PermutationError,
    },

    #[error("Failed to allocate a working directory under {root:?}: {source}")]
    Allocation { root: PathBuf, source: io::Error },

    #[error("Failed to write '{file}' in {workdir:?}: {source}")]
    WriteInput {
        file: &'static str,
        workdir: PathBuf,
        source: io::Error,
    },

    #[error("Failed to copy {from:?} into {workdir:?}: {source}")]
    CopyInput {
        from: PathBuf,
        workdir: PathBuf,
        source: io::Error,
    },

    #[error("Failed to launch {executable:?} in {workdir:?}: {source}")]
    Launch {
        executable: PathBuf,
        workdir: PathBuf,
        source: io::Error,
    },

    #[error("{executable:?} terminated abnormally ({status}) in {workdir:?}\nstderr:\n{stderr}")]
    AbnormalExit {
        executable: PathBuf,
        workdir: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to list engine outputs in {workdir:?}: {source}")]
    CollectOutputs { workdir: PathBuf, source: io::Error },
}

impl SpawnError {
    /// The working directory left behind by the failed attempt, if one was allocated.
    pub fn workdir(&self) -> Option<&PathBuf> {
        match self {
            Self::WriteInput { workdir, .. }
            | Self::CopyInput { workdir, .. }
            | Self::Launch { workdir, .. }
            | Self::AbnormalExit { workdir, .. }
            | Self::CollectOutputs { workdir, .. } => Some(workdir),
            _ => None,
        }
    }

    /// True when the external process could not be started or did not exit cleanly.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::AbnormalExit { .. })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Motif indexing failed: {source}")]
    Motif {
        #[from]
        source: MotifError,
    },

    #[error("Connect job failed: {source}")]
    Spawn {
        #[from]
        source: SpawnError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid permutation groups: {source}")]
    Permutation {
        #[from]
        source: PermutationError,
    },

    #[error(transparent)]
    PermutationLoad(#[from] PermutationLoadError),

    #[error("Failed to read {path:?}: {source}")]
    Format { path: PathBuf, source: FormatError },

    #[error("Potential evaluation failed: {0}")]
    Potential(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    pub fn potential<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Potential(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workdir_is_exposed_only_after_allocation() {
        let mismatch = SpawnError::CoordinateMismatch {
            endpoint: "start",
            expected: 6,
            found: 3,
        };
        assert!(mismatch.workdir().is_none());
        assert!(!mismatch.is_process_failure());

        let launch = SpawnError::Launch {
            executable: PathBuf::from("/missing/OPTIM"),
            workdir: PathBuf::from("/tmp/optimrun.x"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(launch.workdir(), Some(&PathBuf::from("/tmp/optimrun.x")));
        assert!(launch.is_process_failure());
    }

    #[test]
    fn messages_name_paths_for_post_mortem() {
        let error = SpawnError::CopyInput {
            from: PathBuf::from("sys.prmtop"),
            workdir: PathBuf::from("/tmp/optimrun.y"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let message = error.to_string();
        assert!(message.contains("sys.prmtop"));
        assert!(message.contains("/tmp/optimrun.y"));
    }

    #[test]
    fn spawn_errors_convert_into_engine_errors() {
        let error: EngineError = SpawnError::CoordinateMismatch {
            endpoint: "finish",
            expected: 9,
            found: 0,
        }
        .into();
        assert!(matches!(error, EngineError::Spawn { .. }));
    }
}
