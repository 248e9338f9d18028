//! The connect job: a self-contained working directory handed to an external path-search
//! engine, with the engine's exit status and output files as the reply.

pub mod envelope;
pub mod executable;
pub mod templates;
pub mod workdir;

use self::envelope::JobRequest;
use self::executable::ConnectEngine;
use self::templates::{INPUT_FILES, PATH_INFO_FILE};
use self::workdir::WorkDir;
use super::config::ConnectConfig;
use super::error::SpawnError;
use super::progress::{Progress, ProgressReporter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// The engine wrote a non-empty pathway summary.
    Connected { path_info: PathBuf },
    /// The engine exited cleanly without connecting the endpoints.
    NoPathway,
}

/// The reply of a finished connect job.
///
/// Holding the response keeps a temporary working directory alive.
#[derive(Debug)]
pub struct JobResponse {
    workdir: WorkDir,
    exit_status: ExitStatus,
    log_path: PathBuf,
    outputs: Vec<PathBuf>,
    outcome: PathOutcome,
}

impl JobResponse {
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }
    pub fn exit_status(&self) -> ExitStatus {
        self.exit_status
    }
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
    /// Files the engine produced, excluding inputs and the captured log, sorted by name.
    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }
    pub fn outcome(&self) -> &PathOutcome {
        &self.outcome
    }
    pub fn found_pathway(&self) -> bool {
        matches!(self.outcome, PathOutcome::Connected { .. })
    }

    /// Leaves the working directory on disk and returns its path.
    pub fn into_workdir(self) -> PathBuf {
        self.workdir.into_path()
    }
}

/// Materializes `request` in a fresh working directory and runs `engine` there.
///
/// Population strictly precedes invocation. On any failure after allocation the directory is
/// preserved and named in the error.
pub fn spawn(
    request: &JobRequest<'_>,
    engine: &dyn ConnectEngine,
    config: &ConnectConfig,
    reporter: &ProgressReporter,
) -> Result<JobResponse, SpawnError> {
    request.validate()?;

    reporter.report(Progress::PhaseStart {
        name: "Preparing working directory",
    });
    let root = config.workdir_root.as_deref();
    let mut workdir =
        WorkDir::allocate(root, config.workdir_policy).map_err(|source| SpawnError::Allocation {
            root: root.map_or_else(std::env::temp_dir, Path::to_path_buf),
            source,
        })?;
    reporter.report(Progress::WorkdirReady {
        path: workdir.path().to_path_buf(),
    });
    if let Err(e) = request.write_into(workdir.path()) {
        workdir.preserve();
        return Err(e);
    }
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Running path search",
    });
    let log_path = workdir.join(&config.engine_log);
    let exit_status = match engine.run(workdir.path(), &log_path) {
        Ok(status) => status,
        Err(e) => {
            workdir.preserve();
            return Err(e);
        }
    };
    reporter.report(Progress::PhaseFinish);

    let outputs = match collect_outputs(workdir.path(), &config.engine_log) {
        Ok(outputs) => outputs,
        Err(source) => {
            let path = workdir.preserve().to_path_buf();
            return Err(SpawnError::CollectOutputs {
                workdir: path,
                source,
            });
        }
    };
    let outcome = detect_outcome(workdir.path());
    match &outcome {
        PathOutcome::Connected { .. } => info!(
            "Connect job in {:?} found a pathway ({} output file(s)).",
            workdir.path(),
            outputs.len()
        ),
        PathOutcome::NoPathway => warn!(
            "Connect job in {:?} finished without a pathway.",
            workdir.path()
        ),
    }

    Ok(JobResponse {
        workdir,
        exit_status,
        log_path,
        outputs,
        outcome,
    })
}

fn collect_outputs(dir: &Path, engine_log: &str) -> io::Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == engine_log || INPUT_FILES.contains(&name.as_ref()) {
            continue;
        }
        outputs.push(entry.path());
    }
    outputs.sort();
    Ok(outputs)
}

fn detect_outcome(dir: &Path) -> PathOutcome {
    let path_info = dir.join(PATH_INFO_FILE);
    match fs::metadata(&path_info) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => PathOutcome::Connected { path_info },
        _ => PathOutcome::NoPathway,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::permutation::PermutationGroup;
    use crate::engine::config::{ConnectConfigBuilder, ControlFiles, SystemFiles, WorkdirPolicy};
    use std::sync::Mutex;

    /// Stands in for the engine binary: writes the given files and returns a canned status.
    struct ScriptedEngine {
        writes: Vec<(&'static str, &'static str)>,
        fail: bool,
        seen_inputs: Mutex<Vec<String>>,
    }

    impl ScriptedEngine {
        fn writing(writes: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                writes,
                fail: false,
                seen_inputs: Mutex::new(Vec::new()),
            }
        }
    }

    impl ConnectEngine for ScriptedEngine {
        fn executable(&self) -> &Path {
            Path::new("scripted")
        }

        fn run(&self, workdir: &Path, log_path: &Path) -> Result<ExitStatus, SpawnError> {
            let mut seen: Vec<String> = fs::read_dir(workdir)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            seen.sort();
            *self.seen_inputs.lock().unwrap() = seen;

            fs::write(log_path, "log\n").unwrap();
            for (name, content) in &self.writes {
                fs::write(workdir.join(name), content).unwrap();
            }
            if self.fail {
                return Err(SpawnError::Launch {
                    executable: self.executable().to_path_buf(),
                    workdir: workdir.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            Ok(success_status())
        }
    }

    #[cfg(unix)]
    fn success_status() -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }

    #[cfg(windows)]
    fn success_status() -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }

    struct Fixture {
        root: tempfile::TempDir,
        files: SystemFiles,
        controls: ControlFiles,
        group: PermutationGroup,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let prmtop = root.path().join("sys.prmtop");
        let inpcrd = root.path().join("sys.inpcrd");
        fs::write(&prmtop, "prmtop").unwrap();
        fs::write(&inpcrd, "inpcrd").unwrap();
        Fixture {
            root,
            files: SystemFiles { prmtop, inpcrd },
            controls: ControlFiles::default(),
            group: PermutationGroup::new(vec![vec![0, 1]]).unwrap(),
        }
    }

    fn config(fx: &Fixture, policy: WorkdirPolicy) -> ConnectConfig {
        ConnectConfigBuilder::new()
            .executable(PathBuf::from("scripted"))
            .workdir_root(fx.root.path().join("runs"))
            .workdir_policy(policy)
            .build()
            .unwrap()
    }

    fn request<'a>(fx: &'a Fixture, coords: &'a [f64]) -> JobRequest<'a> {
        JobRequest {
            start: coords,
            finish: coords,
            atom_count: 2,
            permutations: &fx.group,
            files: &fx.files,
            controls: &fx.controls,
        }
    }

    #[test]
    fn inputs_exist_before_engine_runs_and_pathway_is_detected() {
        let fx = fixture();
        let coords = [0.0; 6];
        let engine = ScriptedEngine::writing(vec![
            ("path.info", "energies\n"),
            ("min.data.info", "minima\n"),
        ]);
        let response = spawn(
            &request(&fx, &coords),
            &engine,
            &config(&fx, WorkdirPolicy::Temporary),
            &ProgressReporter::new(),
        )
        .unwrap();

        let mut expected: Vec<String> = INPUT_FILES.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(*engine.seen_inputs.lock().unwrap(), expected);

        assert!(response.found_pathway());
        assert_eq!(
            response.outcome(),
            &PathOutcome::Connected {
                path_info: response.workdir().join("path.info")
            }
        );
        assert_eq!(
            response.outputs(),
            &[
                response.workdir().join("min.data.info"),
                response.workdir().join("path.info")
            ]
        );
        assert_eq!(fs::read_to_string(response.log_path()).unwrap(), "log\n");
    }

    #[test]
    fn empty_path_info_means_no_pathway() {
        let fx = fixture();
        let coords = [0.0; 6];
        let engine = ScriptedEngine::writing(vec![("path.info", "")]);
        let response = spawn(
            &request(&fx, &coords),
            &engine,
            &config(&fx, WorkdirPolicy::Temporary),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(response.outcome(), &PathOutcome::NoPathway);
        assert!(response.exit_status().success());
    }

    #[test]
    fn temporary_workdir_lives_as_long_as_the_response() {
        let fx = fixture();
        let coords = [0.0; 6];
        let response = spawn(
            &request(&fx, &coords),
            &ScriptedEngine::writing(vec![]),
            &config(&fx, WorkdirPolicy::Temporary),
            &ProgressReporter::new(),
        )
        .unwrap();
        let path = response.workdir().to_path_buf();
        assert!(path.is_dir());
        drop(response);
        assert!(!path.exists());
    }

    #[test]
    fn failed_run_preserves_workdir() {
        let fx = fixture();
        let coords = [0.0; 6];
        let mut engine = ScriptedEngine::writing(vec![]);
        engine.fail = true;
        let error = spawn(
            &request(&fx, &coords),
            &engine,
            &config(&fx, WorkdirPolicy::Temporary),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        let workdir = error.workdir().unwrap();
        assert!(workdir.join("start").is_file());
        assert!(error.is_process_failure());
    }

    #[test]
    fn mismatched_endpoints_fail_before_allocation() {
        let fx = fixture();
        let coords = [0.0; 3];
        let error = spawn(
            &request(&fx, &coords),
            &ScriptedEngine::writing(vec![]),
            &config(&fx, WorkdirPolicy::Keep),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(error, SpawnError::CoordinateMismatch { .. }));
        assert!(!fx.root.path().join("runs").exists());
    }

    #[test]
    fn progress_reports_workdir_before_running() {
        let fx = fixture();
        let coords = [0.0; 6];
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let label = match event {
                Progress::PhaseStart { name } => name.to_string(),
                Progress::WorkdirReady { .. } => "workdir".to_string(),
                Progress::PhaseFinish => "finish".to_string(),
                Progress::Message(m) => m,
            };
            events.lock().unwrap().push(label);
        }));
        spawn(
            &request(&fx, &coords),
            &ScriptedEngine::writing(vec![]),
            &config(&fx, WorkdirPolicy::Temporary),
            &reporter,
        )
        .unwrap();
        drop(reporter);
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                "Preparing working directory",
                "workdir",
                "finish",
                "Running path search",
                "finish"
            ]
        );
    }
}
