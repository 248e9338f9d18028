use crate::cli::CheckArgs;
use crate::commands::load_system;
use crate::config::PartialAmberConfig;
use crate::error::{CliError, Result};
use crate::utils::coords::read_coordinates_for;
use crate::utils::progress::batch_bar;
use amberpath::core::forcefield::potential::Potential;
use amberpath::engine::validity::TorsionReport;
use amberpath::workflows::system::AmberSystem;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Torsion reports of one conformation file.
#[derive(Debug, Clone)]
pub struct ConformationCheck {
    pub path: PathBuf,
    pub reports: Vec<TorsionReport>,
}

impl ConformationCheck {
    pub fn is_valid(&self) -> bool {
        self.reports.iter().all(|r| r.valid)
    }

    pub fn violations(&self) -> impl Iterator<Item = &TorsionReport> {
        self.reports.iter().filter(|r| !r.valid)
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct ReportRow {
    file: String,
    kind: &'static str,
    atoms: String,
    torsion: Option<f64>,
    state: &'static str,
    valid: bool,
}

impl ReportRow {
    fn new(path: &Path, report: &TorsionReport) -> Self {
        let [a, b, c, d] = report.quartet.atoms();
        Self {
            file: path.display().to_string(),
            kind: report.kind.as_str(),
            atoms: format!("{a} {b} {c} {d}"),
            torsion: report.torsion.map(|t| (t * 1000.0).round() / 1000.0),
            state: report.state_label(),
            valid: report.valid,
        }
    }
}

pub async fn run(args: CheckArgs) -> Result<()> {
    let partial = PartialAmberConfig::discover(args.system.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let resolved = partial.merge_with_cli(&args.system, None, None, None)?;
    let system = load_system(resolved)?;

    let bar = batch_bar(args.inputs.len() as u64, "Checking");
    let checks = tokio::task::block_in_place(|| {
        check_conformations(&system, &args.inputs, Some(&bar))
    });
    bar.finish_and_clear();
    let checks = checks?;

    if let Some(report_path) = &args.report {
        write_report(report_path, &checks)?;
        println!("Torsion report written to: {}", report_path.display());
    }

    for check in &checks {
        if check.is_valid() {
            println!("✓ {}: all {} motif(s) valid", check.path.display(), check.reports.len());
        } else {
            println!("✗ {}", check.path.display());
            for violation in check.violations() {
                println!("    {}", violation);
            }
        }
    }

    let rejected = checks.iter().filter(|c| !c.is_valid()).count();
    if rejected > 0 {
        return Err(CliError::Rejected(format!(
            "{} of {} conformation(s) contain a cis peptide bond or a D alpha carbon",
            rejected,
            checks.len()
        )));
    }
    Ok(())
}

/// Reads and measures every input in parallel. Results keep the order of `inputs`.
pub fn check_conformations<P: Potential>(
    system: &AmberSystem<P>,
    inputs: &[PathBuf],
    progress: Option<&ProgressBar>,
) -> Result<Vec<ConformationCheck>> {
    let checker = system.checker();
    let atom_count = system.atom_count();

    inputs
        .par_iter()
        .map(|path| {
            let coords = read_coordinates_for(path, atom_count)?;
            let reports = checker.report(coords.as_slice());
            if let Some(bar) = progress {
                bar.inc(1);
            }
            let check = ConformationCheck {
                path: path.clone(),
                reports,
            };
            if !check.is_valid() {
                warn!(
                    "{:?} fails {} validity check(s).",
                    path,
                    check.violations().count()
                );
            }
            Ok(check)
        })
        .collect()
}

/// Writes one CSV row per measured motif.
pub fn write_report(path: &Path, checks: &[ConformationCheck]) -> Result<()> {
    let csv_error = |e: csv::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for check in checks {
        for report in &check.reports {
            writer
                .serialize(ReportRow::new(&check.path, report))
                .map_err(csv_error)?;
        }
    }
    writer.flush()?;
    Ok(())
}
