//! CLI command handling
//!
//! Builds the registry, workspace and runner from the command line and the
//! configuration file, then formats the results.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{paths, Error, Result};
use crate::steps::{Registry, StepKind, Workspace};
use crate::testing::{
    discover, ConsoleReporter, JsonReport, Reporter, RunOptions, Runner, ScenarioFilter,
    SilentReporter,
};

/// Dispatch a CLI command
///
/// A run in which any scenario fails returns [`Error::ScenariosFailed`]
/// after the report has been printed.
pub async fn dispatch(command: Commands, config: &Config, verbose: bool) -> Result<()> {
    match command {
        Commands::Run {
            path,
            root,
            tags,
            name,
            stop_on_failure,
            dry_run,
            json,
        } => {
            let cwd = std::env::current_dir()?;
            let features = paths::resolve(&cwd, &path.unwrap_or_else(|| config.run.features.clone()));
            let root = paths::resolve(&cwd, &root.unwrap_or_else(|| config.run.root.clone()));
            let tags = if tags.is_empty() {
                config.run.tags.clone()
            } else {
                tags
            };

            let options = RunOptions {
                stop_on_failure: stop_on_failure || config.run.stop_on_failure,
                dry_run,
                filter: ScenarioFilter::new(&tags, name.as_deref())?,
            };

            run(features, root, options, json, verbose).await
        }

        Commands::Steps { json } => {
            let registry = Registry::new()?;
            let listing: Vec<StepListing> = registry
                .bindings()
                .iter()
                .map(|b| StepListing {
                    kind: b.kind(),
                    pattern: b.pattern().to_string(),
                    doc_string: b.kind().takes_doc_string(),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for entry in &listing {
                    let suffix = if entry.doc_string {
                        " (+ doc string)".dimmed().to_string()
                    } else {
                        String::new()
                    };
                    println!("{}{}", entry.pattern.green(), suffix);
                }
            }
            Ok(())
        }
    }
}

/// One line of `fsbdd steps`
#[derive(Serialize)]
struct StepListing {
    kind: StepKind,
    pattern: String,
    doc_string: bool,
}

async fn run(
    features: PathBuf,
    root: PathBuf,
    options: RunOptions,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let files = discover(&features)?;
    let registry = Registry::new()?;
    tracing::info!(
        features = files.len(),
        root = %root.display(),
        dry_run = options.dry_run,
        "Starting run"
    );

    let runner = Runner::new(&registry, Workspace::new(root), options);

    let mut console = ConsoleReporter::new(verbose);
    let mut silent = SilentReporter;
    let reporter: &mut dyn Reporter = if json { &mut silent } else { &mut console };

    let summary = runner.run_files(&files, reporter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&JsonReport::new(&summary))?);
    }

    if summary.passed() {
        Ok(())
    } else {
        let tally = summary.scenario_tally();
        Err(Error::ScenariosFailed {
            failed: tally.failed + tally.undefined,
            total: tally.total,
        })
    }
}
