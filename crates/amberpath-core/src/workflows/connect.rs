use crate::core::models::permutation::PermutationGroup;
use crate::engine::config::{ConnectConfig, SystemFiles};
use crate::engine::error::SpawnError;
use crate::engine::job::envelope::JobRequest;
use crate::engine::job::executable::ConnectEngine;
use crate::engine::job::{self, JobResponse};
use crate::engine::progress::ProgressReporter;
use std::sync::Arc;
use tracing::{info, instrument};

/// System-wide inputs shared by every job a system creates.
pub(crate) struct JobContext {
    pub(crate) atom_count: usize,
    pub(crate) permutations: PermutationGroup,
    pub(crate) files: SystemFiles,
    pub(crate) connect: ConnectConfig,
    pub(crate) engine: Arc<dyn ConnectEngine>,
}

/// A connect job bound to one system: two endpoints waiting to be handed to the engine.
///
/// The job owns its endpoints and shares the system context, so it can be moved to another
/// thread and run there.
pub struct ConnectJob {
    start: Vec<f64>,
    finish: Vec<f64>,
    context: Arc<JobContext>,
}

impl ConnectJob {
    pub(crate) fn new(
        start: Vec<f64>,
        finish: Vec<f64>,
        context: Arc<JobContext>,
    ) -> Result<Self, SpawnError> {
        let job = Self {
            start,
            finish,
            context,
        };
        job.request().validate()?;
        Ok(job)
    }

    fn request(&self) -> JobRequest<'_> {
        JobRequest {
            start: &self.start,
            finish: &self.finish,
            atom_count: self.context.atom_count,
            permutations: &self.context.permutations,
            files: &self.context.files,
            controls: &self.context.connect.controls,
        }
    }

    pub fn start(&self) -> &[f64] {
        &self.start
    }

    pub fn finish(&self) -> &[f64] {
        &self.finish
    }

    pub fn executable(&self) -> &std::path::Path {
        self.context.engine.executable()
    }

    /// Writes the working directory, runs the engine to completion and collects the reply.
    ///
    /// Blocks for as long as the engine runs.
    #[instrument(skip_all, name = "connect_job")]
    pub fn run(&self, reporter: &ProgressReporter) -> Result<JobResponse, SpawnError> {
        info!(
            "Starting connect job for {} atoms with {:?}.",
            self.context.atom_count,
            self.executable()
        );
        job::spawn(
            &self.request(),
            self.context.engine.as_ref(),
            &self.context.connect,
            reporter,
        )
    }
}

impl std::fmt::Debug for ConnectJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectJob")
            .field("atoms", &self.context.atom_count)
            .field("executable", &self.executable())
            .finish()
    }
}
