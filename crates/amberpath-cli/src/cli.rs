use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "AMBERPATH CLI - Validity filtering and double-ended connect jobs for transition pathways between biomolecular conformations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of threads used when checking several conformations.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the peptide-bond and chirality quartets found in a topology.
    Index(IndexArgs),
    /// Check conformations for cis peptide bonds and D alpha carbons.
    Check(CheckArgs),
    /// Run a double-ended connect job between two endpoint conformations.
    Connect(ConnectArgs),
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MotifSearchArg {
    /// C, O, N, H at consecutive indices, validated against the bonds.
    Layout,
    /// Pattern match over the bond graph.
    Graph,
}

/// Options describing the system, shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SystemArgs {
    /// Path to the configuration file in TOML format.
    /// Falls back to the per-user configuration file when present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the AMBER topology/parameter file.
    #[arg(short, long, value_name = "PATH")]
    pub prmtop: Option<PathBuf>,

    /// Override the AMBER coordinate file copied into connect jobs.
    #[arg(long, value_name = "PATH")]
    pub inpcrd: Option<PathBuf>,

    /// Override the terminal-annotated structure permutation groups are read from.
    #[arg(long, value_name = "PATH")]
    pub permutations: Option<PathBuf>,

    /// Ignore all permutation symmetry.
    #[arg(long, conflicts_with = "permutations")]
    pub no_permutations: bool,

    /// Strategy used to locate peptide bonds.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub motif_search: Option<MotifSearchArg>,
}

/// Arguments for the `index` subcommand.
#[derive(Args, Debug)]
pub struct IndexArgs {
    #[command(flatten)]
    pub system: SystemArgs,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub system: SystemArgs,

    /// Conformations to check (AMBER coordinate files or plain coordinate listings).
    #[arg(required = true, value_name = "COORDS")]
    pub inputs: Vec<PathBuf>,

    /// Write per-motif torsions of every conformation to a CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Arguments for the `connect` subcommand.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub system: SystemArgs,

    /// First endpoint (AMBER coordinate file or plain coordinate listing).
    #[arg(long, required = true, value_name = "COORDS")]
    pub start: PathBuf,

    /// Second endpoint (AMBER coordinate file or plain coordinate listing).
    #[arg(long, required = true, value_name = "COORDS")]
    pub finish: PathBuf,

    /// Override the connect engine executable.
    #[arg(long, value_name = "PATH")]
    pub optim: Option<String>,

    /// Directory under which working directories are created.
    #[arg(long, value_name = "PATH")]
    pub workdir_root: Option<PathBuf>,

    #[command(flatten)]
    pub workdir_policy: WorkdirPolicyFlags,

    /// Refuse to run when either endpoint fails the validity checks.
    #[arg(long)]
    pub require_valid: bool,
}

/// Mutually exclusive flags overriding `connect.keep-workdir`.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct WorkdirPolicyFlags {
    /// Keep the working directory after the job finishes.
    #[arg(long)]
    pub keep_workdir: bool,
    /// Remove the working directory after a successful job.
    #[arg(long)]
    pub remove_workdir: bool,
}
