//! fsbdd - behaviour-driven scenarios for file-system operations
//!
//! Runs Gherkin feature files whose steps create, delete and check for
//! files, and exits non-zero when any scenario fails.

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use fsbdd::common::config::Config;
use fsbdd::common::logging;
use fsbdd::{cli, commands};

#[derive(Parser)]
#[command(name = "fsbdd", about = "Behaviour-driven scenarios for file-system operations")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (doc strings in the report, debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let guard = logging::init_cli(level, config.logging.file.as_deref());

    let result = cli::dispatch(cli.command, &config, cli.verbose).await;

    // Flush the log file before exiting
    drop(guard);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
