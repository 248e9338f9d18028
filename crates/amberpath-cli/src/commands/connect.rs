use crate::cli::ConnectArgs;
use crate::commands::load_system;
use crate::config::PartialAmberConfig;
use crate::error::{CliError, Result};
use crate::utils::coords::read_coordinates_for;
use crate::utils::progress::CliProgressHandler;
use amberpath::core::forcefield::potential::Potential;
use amberpath::engine::job::{JobResponse, PathOutcome};
use amberpath::engine::progress::ProgressReporter;
use amberpath::engine::validity::ValidityChecker;
use amberpath::workflows::system::AmberSystem;
use std::path::Path;
use tracing::{error, info, warn};

pub async fn run(args: ConnectArgs) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting connect job...");
    let response = tokio::task::block_in_place(|| execute(&args, &reporter))?;

    match response.outcome() {
        PathOutcome::Connected { path_info } => {
            println!("✓ Pathway found. Summary: {}", path_info.display());
        }
        PathOutcome::NoPathway => {
            println!("Warning: the engine finished without connecting the endpoints.");
        }
    }
    println!("  Engine log: {}", response.log_path().display());
    for output in response.outputs() {
        println!("  Output: {}", output.display());
    }
    Ok(())
}

/// Resolves the system, reads both endpoints and runs the job to completion.
pub fn execute(args: &ConnectArgs, reporter: &ProgressReporter) -> Result<JobResponse> {
    let partial = PartialAmberConfig::discover(args.system.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let resolved = partial.merge_with_cli(
        &args.system,
        args.optim.as_deref(),
        args.workdir_root.as_deref(),
        Some(args.workdir_policy),
    )?;
    let system = load_system(resolved)?;

    info!("Loading endpoints {:?} and {:?}", &args.start, &args.finish);
    let start = read_coordinates_for(&args.start, system.atom_count())?;
    let finish = read_coordinates_for(&args.finish, system.atom_count())?;

    if args.require_valid {
        ensure_valid(&system, "start", &args.start, start.as_slice())?;
        ensure_valid(&system, "finish", &args.finish, finish.as_slice())?;
    }

    let job = system.connect_job(start.into_inner(), finish.into_inner())?;
    info!("Invoking {:?} on the endpoint pair...", job.executable());

    job.run(reporter).map_err(|e| {
        if let Some(dir) = e.workdir() {
            error!("Connect job failed; working directory kept at {:?}", dir);
        }
        CliError::from(e)
    })
}

fn ensure_valid<P: Potential>(
    system: &AmberSystem<P>,
    endpoint: &str,
    path: &Path,
    coords: &[f64],
) -> Result<()> {
    let checker: &ValidityChecker = system.checker();
    let Some(violation) = checker.report(coords).into_iter().find(|r| !r.valid) else {
        return Ok(());
    };
    warn!("{} endpoint {:?} rejected: {}", endpoint, path, violation);
    Err(CliError::Rejected(format!(
        "{} endpoint {}: {}",
        endpoint,
        path.display(),
        violation
    )))
}
