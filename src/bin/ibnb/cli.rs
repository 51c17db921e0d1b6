use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Interval branch-and-bound minimizer for bivariate test functions.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Function to minimize; prompted for when omitted
    #[arg(short, long, value_name = "NAME")]
    pub function: Option<String>,

    /// Stop splitting boxes whose x-width is at or below this value; prompted
    /// for when omitted
    #[arg(short, long, value_name = "THRESHOLD")]
    pub precision: Option<f64>,

    /// Run on the calling thread instead of the four-worker pool
    #[arg(long)]
    pub sequential: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// List the available functions and exit
    #[arg(long)]
    pub list: bool,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
