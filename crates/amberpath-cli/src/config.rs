use crate::cli::{MotifSearchArg, SystemArgs, WorkdirPolicyFlags};
use crate::error::{CliError, Result};
use amberpath::core::topology::motifs::MotifSearch;
use amberpath::core::topology::permutations::PERMUTATION_PDB_FILENAME;
use amberpath::engine::config::{
    BasinHoppingParams, ConnectConfigBuilder, NebParams, SearchParams, SystemConfig, SystemFiles,
    TsSearchParams, WorkdirPolicy,
};
use amberpath::engine::job::executable::{ConnectEngine, ExternalExecutable};
use amberpath::workflows::system::PermutationSource;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Engine binary used when neither the file nor the command line names one.
pub const DEFAULT_OPTIM_EXECUTABLE: &str = "A9OPTIM";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSystemConfig {
    prmtop: Option<PathBuf>,
    inpcrd: Option<PathBuf>,
    permutation_pdb: Option<PathBuf>,
    permutation_groups: Option<Vec<Vec<usize>>>,
    motif_search: Option<MotifSearchArg>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialExecConfig {
    optim: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialConnectConfig {
    keep_workdir: Option<bool>,
    workdir_root: Option<PathBuf>,
    engine_log: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialAmberConfig {
    system: Option<PartialSystemConfig>,
    exec: Option<PartialExecConfig>,
    connect: Option<PartialConnectConfig>,
    neb: Option<NebParams>,
    ts_search: Option<TsSearchParams>,
    basin_hopping: Option<BasinHoppingParams>,
}

impl From<MotifSearchArg> for MotifSearch {
    fn from(arg: MotifSearchArg) -> Self {
        match arg {
            MotifSearchArg::Layout => MotifSearch::IndexLayout,
            MotifSearchArg::Graph => MotifSearch::BondGraph,
        }
    }
}

/// Settings for one run after file values and command-line flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub system: SystemConfig,
    pub permutations: PermutationSource,
}

/// Location of the per-user configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("edu", "caltech", "amberpath")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl PartialAmberConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads the explicit `--config` file, else the per-user file if it exists, else nothing.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                info!("Using configuration file {:?}.", path);
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Combines file values with command-line overrides. Flags win over the file.
    pub fn merge_with_cli(
        self,
        system: &SystemArgs,
        optim: Option<&str>,
        workdir_root: Option<&Path>,
        workdir_flags: Option<WorkdirPolicyFlags>,
    ) -> Result<ResolvedConfig> {
        let file_system = self.system.unwrap_or_default();
        let exec = self.exec.unwrap_or_default();
        let connect = self.connect.unwrap_or_default();

        let prmtop = system.prmtop.clone().or(file_system.prmtop).ok_or_else(|| {
            CliError::Config(
                "A topology file is required: set `system.prmtop` or pass --prmtop.".to_string(),
            )
        })?;
        let inpcrd = system.inpcrd.clone().or(file_system.inpcrd).ok_or_else(|| {
            CliError::Config(
                "A coordinate file is required: set `system.inpcrd` or pass --inpcrd.".to_string(),
            )
        })?;

        let permutations = Self::merge_permutations(
            system,
            file_system.permutation_pdb,
            file_system.permutation_groups,
        )?;

        let motif_search = system
            .motif_search
            .or(file_system.motif_search)
            .map(MotifSearch::from)
            .unwrap_or_default();

        let executable = optim
            .map(str::to_string)
            .or(exec.optim)
            .unwrap_or_else(|| DEFAULT_OPTIM_EXECUTABLE.to_string());
        let engine = ExternalExecutable::from_config_value(&executable);

        let mut builder = ConnectConfigBuilder::new()
            .executable(engine.executable().to_path_buf())
            .workdir_policy(Self::merge_workdir_policy(
                workdir_flags,
                connect.keep_workdir,
            ));
        if let Some(root) = workdir_root.map(Path::to_path_buf).or(connect.workdir_root) {
            builder = builder.workdir_root(root);
        }
        if let Some(log) = connect.engine_log {
            builder = builder.engine_log(log);
        }
        let connect = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

        let search_params = SearchParams {
            neb: self.neb.unwrap_or_default(),
            ts_search: self.ts_search.unwrap_or_default(),
            basin_hopping: self.basin_hopping.unwrap_or_default(),
        };

        Ok(ResolvedConfig {
            system: SystemConfig {
                files: SystemFiles { prmtop, inpcrd },
                connect,
                motif_search,
                search_params,
            },
            permutations,
        })
    }

    fn merge_permutations(
        system: &SystemArgs,
        file_pdb: Option<PathBuf>,
        file_groups: Option<Vec<Vec<usize>>>,
    ) -> Result<PermutationSource> {
        if system.no_permutations {
            return Ok(PermutationSource::None);
        }
        if let Some(path) = &system.permutations {
            return Ok(PermutationSource::Structure(path.clone()));
        }
        match (file_pdb, file_groups) {
            (Some(_), Some(_)) => Err(CliError::Config(
                "`system.permutation-pdb` and `system.permutation-groups` are mutually exclusive."
                    .to_string(),
            )),
            (Some(path), None) => Ok(PermutationSource::Structure(path)),
            (None, Some(groups)) => Ok(PermutationSource::Explicit(groups)),
            (None, None) => Ok(PermutationSource::Structure(PathBuf::from(
                PERMUTATION_PDB_FILENAME,
            ))),
        }
    }

    fn merge_workdir_policy(
        flags: Option<WorkdirPolicyFlags>,
        file_keep: Option<bool>,
    ) -> WorkdirPolicy {
        match flags {
            Some(f) if f.keep_workdir => WorkdirPolicy::Keep,
            Some(f) if f.remove_workdir => WorkdirPolicy::Temporary,
            _ => match file_keep {
                Some(false) => WorkdirPolicy::Temporary,
                Some(true) | None => WorkdirPolicy::Keep,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    fn system_args(extra: &[&str]) -> SystemArgs {
        let mut args = vec!["amberpath", "index"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Index(args) => args.system,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn parse(content: &str) -> PartialAmberConfig {
        PartialAmberConfig::from_toml(content).unwrap()
    }

    #[test]
    fn file_values_fill_the_system() {
        let config = parse(
            r#"
            [system]
            prmtop = "coords.prmtop"
            inpcrd = "coords.inpcrd"
            motif-search = "graph"

            [exec]
            optim = "/opt/optim/A9OPTIM"

            [connect]
            keep-workdir = false
            workdir-root = "/scratch/runs"

            [neb]
            k = 50.0
            "#,
        );
        let resolved = config
            .merge_with_cli(&system_args(&[]), None, None, None)
            .unwrap();
        let system = resolved.system;
        assert_eq!(system.files.prmtop, PathBuf::from("coords.prmtop"));
        assert_eq!(system.motif_search, MotifSearch::BondGraph);
        assert_eq!(system.connect.executable, PathBuf::from("/opt/optim/A9OPTIM"));
        assert_eq!(system.connect.workdir_policy, WorkdirPolicy::Temporary);
        assert_eq!(system.connect.workdir_root, Some(PathBuf::from("/scratch/runs")));
        assert_eq!(system.search_params.neb.k, 50.0);
        assert_eq!(system.search_params.neb.max_images, 100);
        assert_eq!(
            resolved.permutations,
            PermutationSource::Structure(PathBuf::from(PERMUTATION_PDB_FILENAME))
        );
    }

    #[test]
    fn cli_flags_override_file_values() {
        let config = parse(
            r#"
            [system]
            prmtop = "file.prmtop"
            inpcrd = "file.inpcrd"
            permutation-groups = [[1, 2, 3]]
            [connect]
            keep-workdir = false
            "#,
        );
        let args = system_args(&["--prmtop", "cli.prmtop", "--motif-search", "layout"]);
        let flags = WorkdirPolicyFlags {
            keep_workdir: true,
            remove_workdir: false,
        };
        let resolved = config
            .merge_with_cli(&args, Some("/usr/bin/OPTIM"), Some(Path::new("/tmp/x")), Some(flags))
            .unwrap();
        assert_eq!(resolved.system.files.prmtop, PathBuf::from("cli.prmtop"));
        assert_eq!(resolved.system.files.inpcrd, PathBuf::from("file.inpcrd"));
        assert_eq!(resolved.system.motif_search, MotifSearch::IndexLayout);
        assert_eq!(resolved.system.connect.executable, PathBuf::from("/usr/bin/OPTIM"));
        assert_eq!(resolved.system.connect.workdir_policy, WorkdirPolicy::Keep);
        assert_eq!(resolved.system.connect.workdir_root, Some(PathBuf::from("/tmp/x")));
        assert_eq!(
            resolved.permutations,
            PermutationSource::Explicit(vec![vec![1, 2, 3]])
        );
    }

    #[test]
    fn no_permutations_flag_wins() {
        let config = parse("[system]\nprmtop = \"a\"\ninpcrd = \"b\"\npermutation-pdb = \"p.pdb\"\n");
        let resolved = config
            .merge_with_cli(&system_args(&["--no-permutations"]), None, None, None)
            .unwrap();
        assert_eq!(resolved.permutations, PermutationSource::None);
    }

    #[test]
    fn conflicting_permutation_sources_are_rejected() {
        let config = parse(
            "[system]\nprmtop = \"a\"\ninpcrd = \"b\"\npermutation-pdb = \"p.pdb\"\npermutation-groups = [[0, 1]]\n",
        );
        let result = config.merge_with_cli(&system_args(&[]), None, None, None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_topology_is_a_config_error() {
        let result = PartialAmberConfig::default().merge_with_cli(&system_args(&[]), None, None, None);
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("prmtop")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn default_executable_is_used_when_unset() {
        let resolved = parse("[system]\nprmtop = \"a\"\ninpcrd = \"b\"\n")
            .merge_with_cli(&system_args(&[]), None, None, None)
            .unwrap();
        assert_eq!(
            resolved.system.connect.executable,
            PathBuf::from(DEFAULT_OPTIM_EXECUTABLE)
        );
        assert_eq!(resolved.system.connect.workdir_policy, WorkdirPolicy::Keep);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PartialAmberConfig::from_toml("[system]\ntopology = \"x\"\n").is_err());
        assert!(PartialAmberConfig::from_toml("[neb]\nspring = 1.0\n").is_err());
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[system\n").unwrap();
        match PartialAmberConfig::from_file(&path) {
            Err(CliError::FileParsing { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn explicit_config_path_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amberpath.toml");
        fs::write(&path, "[exec]\noptim = \"/x/OPTIM\"\n").unwrap();
        let config = PartialAmberConfig::discover(Some(&path)).unwrap();
        assert_eq!(
            config.exec.and_then(|e| e.optim),
            Some("/x/OPTIM".to_string())
        );
    }
}
