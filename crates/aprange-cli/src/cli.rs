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
    author = "aprange contributors",
    version,
    about = "aprange CLI - Inspect, convert and apply atom probe mass-to-charge range files (.RRNG).",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity; command logs rise first, library logs one step behind (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and the progress bar
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.precision=2
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a range file: ions, elements and every range definition.
    Info(InfoArgs),
    /// Find the range containing each of the given mass-to-charge values.
    Lookup(LookupArgs),
    /// Export the range definitions of a range file as a CSV table.
    Export(ExportArgs),
    /// Re-write a range file in canonical form.
    Convert(ConvertArgs),
    /// Range a list of mass-to-charge values and report ionic and elemental composition.
    Quant(QuantArgs),
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input range file (e.g., ranges.rrng).
    #[arg(value_name = "RRNG")]
    pub input: PathBuf,

    /// Override `output.sorted` from the config file.
    #[command(flatten)]
    pub order: RangeOrder,
}

/// A group to handle mutually exclusive flags for the order ranges are listed in.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct RangeOrder {
    /// List ranges by ascending lower bound.
    #[arg(long)]
    pub sorted: bool,
    /// List ranges in the order they appear in the file.
    #[arg(long)]
    pub file_order: bool,
}

impl RangeOrder {
    pub fn resolve(self, configured: bool) -> bool {
        match (self.sorted, self.file_order) {
            (true, false) => true,
            (false, true) => false,
            _ => configured,
        }
    }
}

/// Arguments for the `lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Path to the input range file.
    #[arg(value_name = "RRNG")]
    pub input: PathBuf,

    /// One or more mass-to-charge values (Da).
    #[arg(value_name = "MASS", required = true, num_args(1..), allow_negative_numbers = true)]
    pub masses: Vec<f64>,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the input range file.
    #[arg(value_name = "RRNG")]
    pub input: PathBuf,

    /// Path for the output CSV file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input range file.
    #[arg(value_name = "RRNG")]
    pub input: PathBuf,

    /// Path for the output range file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Renumber ranges by ascending lower bound.
    #[arg(long)]
    pub sort: bool,
}

/// Arguments for the `quant` subcommand.
#[derive(Args, Debug)]
pub struct QuantArgs {
    /// Path to the input range file.
    #[arg(value_name = "RRNG")]
    pub input: PathBuf,

    /// Path to a CSV file with a header row and a column of mass-to-charge values.
    #[arg(value_name = "MASSES")]
    pub masses: PathBuf,

    /// Only range values inside this window, e.g. '10:80' (lower inclusive, upper exclusive).
    #[arg(short, long, value_name = "LOW:HIGH")]
    pub window: Option<String>,

    /// Name of the mass-to-charge column, overriding `quant.mass-column`.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Skip decomposing ions into elemental composition.
    #[arg(long)]
    pub no_decompose: bool,
}
