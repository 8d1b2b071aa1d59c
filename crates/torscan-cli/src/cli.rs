use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "TorScan CLI - Extract, normalize, and plot energies from QM/MM dihedral-angle scans.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Catalogue and analyze the energies of QM and/or MM dihedral scans.
    Scan(ScanArgs),
    /// Pre-optimize the conformers of a molecule file and generate the QM job input.
    Prepare(PrepareArgs),
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to a TOML configuration file; command-line flags take precedence
    /// over its values.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- QM-related arguments ---
    /// Directory containing the QM angle subdirectories.
    #[arg(long, value_name = "DIR")]
    pub qm_dir: Option<PathBuf>,

    /// Name of the QM output file (same name for all angles).
    #[arg(long, value_name = "NAME")]
    pub qm_file: Option<String>,

    /// Theory-level subdirectory between each angle directory and its output file.
    #[arg(short = 't', long, value_name = "NAME")]
    pub theory: Option<String>,

    /// Only process QM results.
    #[arg(long)]
    pub qm_only: bool,

    // --- MM-related arguments ---
    /// Directory containing the MM angle subdirectories.
    #[arg(long, value_name = "DIR")]
    pub mm_dir: Option<PathBuf>,

    /// Name of the MM log file (same name for all angles).
    #[arg(long, value_name = "NAME")]
    pub mm_file: Option<String>,

    /// Only process MM results.
    #[arg(long)]
    pub mm_only: bool,

    /// Force constant k used to restrain the dihedral in the MM
    /// minimization. When given, the harmonic restraint energy
    /// k(x - x0)^2 is subtracted from each MM total. Leave unset unless
    /// you are sure the MM engine's reported potential still includes the
    /// restraint term; subtracting it twice makes the profile meaningless.
    #[arg(short = 'k', long, value_name = "FLOAT")]
    pub force_constant: Option<f64>,

    // --- Output-related arguments ---
    /// Print the per-angle result tables to stdout.
    #[arg(long)]
    pub show: bool,

    /// Save an SVG figure for each processed scan (and a combined one when
    /// both methods run).
    #[arg(long)]
    pub save: bool,

    /// Recompute summaries even when cache files already exist.
    #[arg(long)]
    pub force_refresh: bool,

    /// Directory for summary caches, figures, and the combined report.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip writing the combined summary.dat report.
    #[arg(long)]
    pub no_report: bool,
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the input molecule file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the optimized molecule file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Helper executable implementing the chemistry toolkit operations
    /// (read, assign-names, add-hydrogens, quick-opt, make-input), each a
    /// stdin-to-stdout filter over molecule text.
    #[arg(long, required = true, value_name = "CMD")]
    pub toolkit: PathBuf,

    /// Molecule name used in the generated QM job input.
    #[arg(long, value_name = "NAME", default_value = "molecule")]
    pub name: String,

    /// QM method for the generated job input.
    #[arg(long, default_value = "mp2")]
    pub method: String,

    /// Basis set for the generated job input.
    #[arg(long, default_value = "6-31G*")]
    pub basis: String,

    /// Task for the generated job input.
    #[arg(long, default_value = "opt")]
    pub task: String,

    /// Memory request for the generated job input.
    #[arg(long, default_value = "2 Gb")]
    pub memory: String,

    /// Path for the generated QM job input file.
    #[arg(long, value_name = "PATH", default_value = "input.dat")]
    pub qm_input: PathBuf,
}
