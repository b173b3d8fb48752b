mod commands;
mod error;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::commands::{Commands, Context};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "bumpwright")]
#[command(version = env!("BUMPWRIGHT_VERSION"))]
#[command(about = "Patch-bump monorepo packages whose sources changed", long_about = None)]
struct Cli {
    /// Directory to start registry discovery from (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    path: Option<PathBuf>,

    /// Registry file to use instead of discovering bumpwright.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the full plan and enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let start_path = match resolve_start_path(cli.path) {
        Ok(path) => path,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    debug!(start_path = %start_path.display(), config = ?cli.config, "resolved invocation");

    let context = Context {
        start_path,
        config: cli.config,
        verbose: cli.verbose,
    };

    if let Err(e) = cli.command.execute(&context) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }

    for path in error.written_paths() {
        eprintln!("written: {}", path.display());
    }
}
