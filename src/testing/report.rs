//! Run results and reporters
//!
//! The runner records a [`StepResult`] for every step it visits and
//! forwards progress to a [`Reporter`]. The console reporter prints a
//! coloured transcript; the collected [`RunSummary`] can also be
//! serialized as JSON.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::common::Error;

use super::feature::{Feature, Scenario};

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
    Undefined,
    Ambiguous,
}

/// Outcome of a scenario, derived from its steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Undefined,
    Skipped,
}

impl ScenarioStatus {
    /// Whether this outcome fails the run
    pub fn is_failure(self) -> bool {
        matches!(self, ScenarioStatus::Failed | ScenarioStatus::Undefined)
    }
}

/// Recorded result of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub keyword: String,
    pub text: String,
    pub line: usize,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

/// Error detail attached to a failed, undefined or ambiguous step
#[derive(Debug, Clone, Serialize)]
pub struct StepError {
    pub code: String,
    pub message: String,
}

impl From<&Error> for StepError {
    fn from(e: &Error) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

/// Recorded result of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub line: usize,
    pub status: ScenarioStatus,
    pub steps: Vec<StepResult>,
}

impl ScenarioResult {
    /// Build a result, deriving the status from the step outcomes
    pub fn from_steps(scenario: &Scenario, steps: Vec<StepResult>) -> Self {
        let status = if steps.iter().any(|s| s.status == StepStatus::Failed) {
            ScenarioStatus::Failed
        } else if steps
            .iter()
            .any(|s| matches!(s.status, StepStatus::Undefined | StepStatus::Ambiguous))
        {
            ScenarioStatus::Undefined
        } else if !steps.is_empty() && steps.iter().all(|s| s.status == StepStatus::Skipped) {
            ScenarioStatus::Skipped
        } else {
            ScenarioStatus::Passed
        };
        Self {
            name: scenario.name.clone(),
            line: scenario.line,
            status,
            steps,
        }
    }
}

/// Results for one feature file
#[derive(Debug, Clone, Serialize)]
pub struct FeatureResult {
    pub name: String,
    pub path: PathBuf,
    pub scenarios: Vec<ScenarioResult>,
}

/// Counts per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub undefined: usize,
}

/// Aggregate result of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub features: Vec<FeatureResult>,
}

impl RunSummary {
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.features.iter().flat_map(|f| f.scenarios.iter())
    }

    pub fn scenario_tally(&self) -> Tally {
        let mut tally = Tally::default();
        for scenario in self.scenarios() {
            tally.total += 1;
            match scenario.status {
                ScenarioStatus::Passed => tally.passed += 1,
                ScenarioStatus::Failed => tally.failed += 1,
                ScenarioStatus::Skipped => tally.skipped += 1,
                ScenarioStatus::Undefined => tally.undefined += 1,
            }
        }
        tally
    }

    pub fn step_tally(&self) -> Tally {
        let mut tally = Tally::default();
        for step in self.scenarios().flat_map(|s| s.steps.iter()) {
            tally.total += 1;
            match step.status {
                StepStatus::Passed => tally.passed += 1,
                StepStatus::Failed => tally.failed += 1,
                StepStatus::Skipped => tally.skipped += 1,
                StepStatus::Undefined | StepStatus::Ambiguous => tally.undefined += 1,
            }
        }
        tally
    }

    /// True when no scenario failed or had an unbound step
    pub fn passed(&self) -> bool {
        !self.scenarios().any(|s| s.status.is_failure())
    }
}

/// JSON document written by `fsbdd run --json`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub passed: bool,
    pub scenarios: Tally,
    pub steps: Tally,
    pub features: &'a [FeatureResult],
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &'a RunSummary) -> Self {
        Self {
            passed: summary.passed(),
            scenarios: summary.scenario_tally(),
            steps: summary.step_tally(),
            features: &summary.features,
        }
    }
}

/// Receives progress while a run executes
pub trait Reporter {
    fn feature_started(&mut self, _feature: &Feature) {}
    fn scenario_started(&mut self, _scenario: &Scenario) {}
    fn step_finished(&mut self, _step: &StepResult) {}
    fn scenario_finished(&mut self, _result: &ScenarioResult) {}
    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// Reporter that prints nothing; used for JSON output and in tests
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Human-readable coloured transcript on stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn feature_started(&mut self, feature: &Feature) {
        println!(
            "\n{} {}",
            "Feature:".blue().bold(),
            feature.name.white().bold()
        );
        println!("  {}", feature.path.display().to_string().dimmed());
        if self.verbose {
            if let Some(desc) = &feature.description {
                println!("  {}", desc.dimmed());
            }
        }
    }

    fn scenario_started(&mut self, scenario: &Scenario) {
        let tags = if scenario.tags.is_empty() {
            String::new()
        } else {
            let tags: Vec<String> = scenario.tags.iter().map(|t| format!("@{}", t)).collect();
            format!(" {}", tags.join(" ")).dimmed().to_string()
        };
        println!("\n  {} {}{}", "Scenario:".cyan(), scenario.name, tags);
    }

    fn step_finished(&mut self, step: &StepResult) {
        let line = format!("{} {}", step.keyword, step.text);
        match step.status {
            StepStatus::Passed => println!("    {} {}", "✓".green(), line),
            StepStatus::Failed => println!("    {} {}", "✗".red(), line.red()),
            StepStatus::Skipped => println!("    {} {}", "-".cyan(), line.dimmed()),
            StepStatus::Undefined => println!("    {} {} {}", "?".yellow(), line.yellow(), "(undefined)".dimmed()),
            StepStatus::Ambiguous => println!("    {} {} {}", "?".yellow(), line.yellow(), "(ambiguous)".dimmed()),
        }

        if self.verbose {
            if let Some(doc) = &step.doc_string {
                for doc_line in doc.lines() {
                    println!("        {}", doc_line.dimmed());
                }
            }
        }

        if let Some(err) = &step.error {
            println!("        {}", err.message.red());
        }
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        let scenarios = summary.scenario_tally();
        let steps = summary.step_tally();

        println!();
        println!("{} scenarios ({})", scenarios.total, describe(&scenarios));
        println!("{} steps ({})", steps.total, describe(&steps));

        if summary.passed() {
            println!("\n{} {}\n", "✓".green().bold(), "All scenarios passed".green().bold());
        } else {
            println!("\n{} {}\n", "✗".red().bold(), "Some scenarios failed".red().bold());
        }
    }
}

/// "2 passed, 1 failed" style breakdown, omitting zero counts
fn describe(tally: &Tally) -> String {
    let parts: Vec<String> = [
        (tally.passed, "passed"),
        (tally.failed, "failed"),
        (tally.skipped, "skipped"),
        (tally.undefined, "undefined"),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{} {}", count, label))
    .collect();

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
