mod cli;
mod error;
mod logging;
mod prompt;

use std::io::{self, Write};

use clap::Parser;
use interval_bnb::{FunctionRegistry, Minimizer};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::Result;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let registry = FunctionRegistry::standard()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        for name in registry.names() {
            let func = registry.get(name)?;
            writeln!(out, "{:<18} {}", name, func.domain)?;
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let function = match cli.function {
        Some(name) => name,
        None => {
            let choices: Vec<&str> = registry.names().collect();
            prompt::prompt_function(&mut input, &mut out, &mut io::stderr(), &choices)?
        }
    };
    let precision = match cli.precision {
        Some(p) => p,
        None => prompt::prompt_precision(&mut input, &mut out)?,
    };

    let minimizer = Minimizer::from_registry(&registry, &function)?.threshold(precision);
    let minimizer = if cli.sequential {
        minimizer.sequential()
    } else {
        minimizer.distributed()
    };
    info!(function = %function, precision, sequential = cli.sequential, "starting search");

    let result = minimizer.minimize()?;
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", result)?;
    }
    Ok(())
}
