//! CLI command definitions
//!
//! Defines the clap commands for the fsbdd CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scenarios in a feature file or directory
    Run {
        /// Feature file or directory (default: `features`, or the config value)
        path: Option<PathBuf>,

        /// Directory that step paths are resolved under (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Only run scenarios matching a tag expression, e.g. `@smoke and not @wip`.
        /// Can be specified multiple times; every expression must match
        #[arg(long = "tags", short = 't')]
        tags: Vec<String>,

        /// Only run scenarios whose name matches this regular expression
        #[arg(long)]
        name: Option<String>,

        /// Skip all remaining scenarios after the first failure
        #[arg(long)]
        stop_on_failure: bool,

        /// Match every step against the registry without touching the file system
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the registered step patterns
    Steps {
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}
