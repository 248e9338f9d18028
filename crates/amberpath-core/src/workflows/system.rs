use super::connect::{ConnectJob, JobContext};
use crate::core::forcefield::potential::{Potential, TopologyOnly};
use crate::core::io::prmtop::PrmtopFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::permutation::PermutationGroup;
use crate::core::models::topology::Topology;
use crate::core::topology::motifs::MotifIndex;
use crate::core::topology::permutations::load_permutation_group;
use crate::engine::config::{
    BasinHoppingParams, NebParams, SearchParams, SystemConfig, SystemFiles, TsSearchParams,
};
use crate::engine::error::{EngineError, SpawnError};
use crate::engine::filters::{self, AcceptanceFilter, NodeFilter};
use crate::engine::job::executable::{ConnectEngine, ExternalExecutable};
use crate::engine::validity::ValidityChecker;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Where a system's permutation groups come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PermutationSource {
    /// No permutation symmetry.
    None,
    /// A terminal-annotated structure file; a missing file means no symmetry.
    Structure(PathBuf),
    /// Groups given directly as zero-based atom indices.
    Explicit(Vec<Vec<usize>>),
}

impl PermutationSource {
    pub fn resolve(&self) -> Result<PermutationGroup, EngineError> {
        match self {
            PermutationSource::None => Ok(PermutationGroup::empty()),
            PermutationSource::Structure(path) => Ok(load_permutation_group(path)?),
            PermutationSource::Explicit(groups) => Ok(PermutationGroup::new(groups.clone())?),
        }
    }
}

/// Ratio of analytic to numerical gradient disagreement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDiscrepancy {
    /// Largest absolute component difference.
    pub max_abs_difference: f64,
    /// Largest absolute numerical gradient component.
    pub max_numerical: f64,
}

impl GradientDiscrepancy {
    pub fn relative(&self) -> f64 {
        if self.max_numerical == 0.0 {
            self.max_abs_difference
        } else {
            self.max_abs_difference / self.max_numerical
        }
    }
}

/// A biomolecular system wired for pathway searches.
///
/// Construction indexes the potential's topology once. The resulting validity checks are
/// handed out as filters, and connect jobs created here carry this system's files and
/// permutation groups.
pub struct AmberSystem<P> {
    potential: P,
    checker: ValidityChecker,
    search_params: SearchParams,
    jobs: Arc<JobContext>,
}

impl AmberSystem<TopologyOnly> {
    /// Builds a system from the parameter file alone. Energy evaluation is unavailable.
    pub fn from_files(
        config: SystemConfig,
        permutations: &PermutationSource,
    ) -> Result<Self, EngineError> {
        let topology =
            PrmtopFile::read_from_path(&config.files.prmtop).map_err(|source| {
                EngineError::Format {
                    path: config.files.prmtop.clone(),
                    source,
                }
            })?;
        let group = permutations.resolve()?;
        Self::new(TopologyOnly::new(topology), group, config)
    }
}

impl<P: Potential> AmberSystem<P> {
    #[instrument(skip_all, name = "amber_system_setup")]
    pub fn new(
        potential: P,
        permutations: PermutationGroup,
        config: SystemConfig,
    ) -> Result<Self, EngineError> {
        let topology = potential.topology();
        permutations.validate_against(topology.atom_count())?;
        let index = MotifIndex::build(topology, config.motif_search)?;

        info!(
            "System ready: {} atoms, {} permutation group(s), engine {:?}.",
            topology.atom_count(),
            permutations.len(),
            config.connect.executable
        );

        let engine: Arc<dyn ConnectEngine> =
            Arc::new(ExternalExecutable::new(config.connect.executable.clone()));
        let jobs = Arc::new(JobContext {
            atom_count: topology.atom_count(),
            permutations,
            files: config.files,
            connect: config.connect,
            engine,
        });

        Ok(Self {
            potential,
            checker: ValidityChecker::new(Arc::new(index)),
            search_params: config.search_params,
            jobs,
        })
    }

    /// Replaces the process boundary, for instance with an in-process engine.
    pub fn with_engine(mut self, engine: Arc<dyn ConnectEngine>) -> Self {
        let context = JobContext {
            atom_count: self.jobs.atom_count,
            permutations: self.jobs.permutations.clone(),
            files: self.jobs.files.clone(),
            connect: self.jobs.connect.clone(),
            engine,
        };
        self.jobs = Arc::new(context);
        self
    }

    pub fn potential(&self) -> &P {
        &self.potential
    }

    pub fn topology(&self) -> &Topology {
        self.potential.topology()
    }

    pub fn atom_count(&self) -> usize {
        self.jobs.atom_count
    }

    pub fn motif_index(&self) -> &MotifIndex {
        self.checker.index()
    }

    pub fn checker(&self) -> &ValidityChecker {
        &self.checker
    }

    pub fn permutations(&self) -> &PermutationGroup {
        &self.jobs.permutations
    }

    pub fn files(&self) -> &SystemFiles {
        &self.jobs.files
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search_params
    }

    pub fn neb_params(&self) -> &NebParams {
        &self.search_params.neb
    }

    pub fn ts_search_params(&self) -> &TsSearchParams {
        &self.search_params.ts_search
    }

    pub fn basin_hopping_params(&self) -> &BasinHoppingParams {
        &self.search_params.basin_hopping
    }

    pub fn cis_trans_filter(&self) -> AcceptanceFilter {
        filters::cis_trans_filter(self.checker.clone())
    }

    pub fn chirality_filter(&self) -> AcceptanceFilter {
        filters::chirality_filter(self.checker.clone())
    }

    /// Both acceptance filters, for drivers that take a list of tests.
    pub fn conformation_checks(&self) -> Vec<AcceptanceFilter> {
        vec![self.cis_trans_filter(), self.chirality_filter()]
    }

    /// The combined validity test applied to every node of a connected path.
    pub fn path_node_filter(&self) -> NodeFilter {
        filters::node_filter(filters::all_of(self.conformation_checks()))
    }

    /// Binds a pair of endpoints to this system.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::CoordinateMismatch`] if either endpoint does not hold exactly
    /// three values per atom.
    pub fn connect_job(&self, start: Vec<f64>, finish: Vec<f64>) -> Result<ConnectJob, SpawnError> {
        ConnectJob::new(start, finish, Arc::clone(&self.jobs))
    }

    /// Compares the potential's analytic gradient with central differences at `coords`.
    pub fn gradient_discrepancy(
        &self,
        coords: &[f64],
        eps: f64,
    ) -> Result<GradientDiscrepancy, EngineError> {
        let (_, analytic) = self
            .potential
            .energy_gradient(coords)
            .map_err(EngineError::potential)?;
        let numerical = self
            .potential
            .numerical_gradient(coords, eps)
            .map_err(EngineError::potential)?;

        let max_abs_difference = numerical
            .iter()
            .zip(&analytic)
            .map(|(n, a)| (n - a).abs())
            .fold(0.0, f64::max);
        let max_numerical = numerical.iter().map(|n| n.abs()).fold(0.0, f64::max);
        Ok(GradientDiscrepancy {
            max_abs_difference,
            max_numerical,
        })
    }
}
