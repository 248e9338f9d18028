use super::job::templates::{DEFAULT_ENGINE_LOG, MINIMIZATION_CONTROL, OPTIONS};
use crate::core::topology::motifs::MotifSearch;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// The two parameter files that travel with every connect job: the topology/parameter file
/// and the coordinate file the engine reads alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemFiles {
    pub prmtop: PathBuf,
    pub inpcrd: PathBuf,
}

/// What happens to a job's working directory once its response is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkdirPolicy {
    /// The directory is removed when the response is dropped, unless the job failed.
    Temporary,
    /// The directory always stays on disk.
    #[default]
    Keep,
}

/// Text of the engine control files. Defaults to the pinned templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFiles {
    pub minimization: String,
    pub options: String,
}

impl Default for ControlFiles {
    fn default() -> Self {
        Self {
            minimization: MINIMIZATION_CONTROL.to_string(),
            options: OPTIONS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectConfig {
    pub executable: PathBuf,
    pub workdir_root: Option<PathBuf>,
    pub workdir_policy: WorkdirPolicy,
    pub engine_log: String,
    pub controls: ControlFiles,
}

#[derive(Default)]
pub struct ConnectConfigBuilder {
    executable: Option<PathBuf>,
    workdir_root: Option<PathBuf>,
    workdir_policy: Option<WorkdirPolicy>,
    engine_log: Option<String>,
    minimization_control: Option<String>,
}

impl ConnectConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executable(mut self, path: PathBuf) -> Self {
        self.executable = Some(path);
        self
    }
    pub fn workdir_root(mut self, path: PathBuf) -> Self {
        self.workdir_root = Some(path);
        self
    }
    pub fn workdir_policy(mut self, policy: WorkdirPolicy) -> Self {
        self.workdir_policy = Some(policy);
        self
    }
    pub fn engine_log(mut self, file_name: impl Into<String>) -> Self {
        self.engine_log = Some(file_name.into());
        self
    }
    /// Replaces the minimization control stanza for systems that need different cutoffs.
    pub fn minimization_control(mut self, text: impl Into<String>) -> Self {
        self.minimization_control = Some(text.into());
        self
    }

    pub fn build(self) -> Result<ConnectConfig, ConfigError> {
        let executable = self
            .executable
            .ok_or(ConfigError::MissingParameter("executable"))?;
        if executable.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "executable",
                reason: "must not be blank".into(),
            });
        }

        let engine_log = self
            .engine_log
            .unwrap_or_else(|| DEFAULT_ENGINE_LOG.to_string());
        if engine_log.is_empty() || engine_log.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                parameter: "engine_log",
                reason: format!("'{}' must be a plain file name", engine_log),
            });
        }

        let mut controls = ControlFiles::default();
        if let Some(text) = self.minimization_control {
            controls.minimization = text;
        }

        Ok(ConnectConfig {
            executable,
            workdir_root: self.workdir_root,
            workdir_policy: self.workdir_policy.unwrap_or_default(),
            engine_log,
            controls,
        })
    }
}

/// Quench settings of the band relaxation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NebQuenchParams {
    pub max_e_rise: f64,
    pub max_step: f64,
    pub tol: f64,
    pub iprint: i32,
}

impl Default for NebQuenchParams {
    fn default() -> Self {
        Self {
            max_e_rise: 100.5,
            max_step: 0.1,
            tol: 1e-2,
            iprint: 50,
        }
    }
}

/// Nudged elastic band settings handed to the path-connection driver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NebParams {
    pub iter_density: f64,
    pub image_density: f64,
    pub max_images: usize,
    pub k: f64,
    pub adjust_k_freq: usize,
    pub quench: NebQuenchParams,
}

impl Default for NebParams {
    fn default() -> Self {
        Self {
            iter_density: 15.0,
            image_density: 10.0,
            max_images: 100,
            k: 100.0,
            adjust_k_freq: 5,
            quench: NebQuenchParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LowestEigenvectorParams {
    pub nsteps: usize,
    pub tol: f64,
    pub iprint: i32,
}

impl Default for LowestEigenvectorParams {
    fn default() -> Self {
        Self {
            nsteps: 100,
            tol: 0.001,
            iprint: -50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TangentSpaceParams {
    pub max_step: f64,
    pub iprint: i32,
}

impl Default for TangentSpaceParams {
    fn default() -> Self {
        Self {
            max_step: 0.1,
            iprint: -5,
        }
    }
}

/// Eigenvector-following transition state refinement settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TsSearchParams {
    pub nsteps: usize,
    pub lowest_eigenvector: LowestEigenvectorParams,
    pub tangent_space: TangentSpaceParams,
    pub nfail_max: usize,
    pub nsteps_tangent1: usize,
    pub nsteps_tangent2: usize,
    pub max_uphill_step: f64,
    pub verbosity: i32,
    pub iprint: i32,
}

impl Default for TsSearchParams {
    fn default() -> Self {
        Self {
            nsteps: 200,
            lowest_eigenvector: LowestEigenvectorParams::default(),
            tangent_space: TangentSpaceParams::default(),
            nfail_max: 1000,
            nsteps_tangent1: 5,
            nsteps_tangent2: 100,
            max_uphill_step: 0.3,
            verbosity: 0,
            iprint: 10,
        }
    }
}

/// Global search settings handed to the basin-hopping driver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BasinHoppingParams {
    pub temperature: f64,
    pub insert_rejected: bool,
    pub database_accuracy: f64,
    pub step_size: f64,
    pub adaptive_interval: usize,
}

impl Default for BasinHoppingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            insert_rejected: true,
            database_accuracy: 1e-3,
            step_size: 2.0,
            adaptive_interval: 50,
        }
    }
}

/// Tuning blocks for the external search stages.
///
/// These values are not interpreted here; they are held so external drivers can be
/// configured from the same place as the system.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SearchParams {
    pub neb: NebParams,
    pub ts_search: TsSearchParams,
    pub basin_hopping: BasinHoppingParams,
}

/// Everything `AmberSystem` needs beyond the potential itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub files: SystemFiles,
    pub connect: ConnectConfig,
    pub motif_search: MotifSearch,
    pub search_params: SearchParams,
}
