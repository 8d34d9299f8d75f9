//! Scenario runner
//!
//! Reads Gherkin feature files, routes every step through the step
//! registry and reports pass/fail per step, scenario and run.

mod feature;
mod filter;
mod parser;
mod report;
mod runner;

pub use feature::{Feature, Scenario, Step};
pub use filter::ScenarioFilter;
pub use parser::{discover, load_feature};
pub use report::{
    ConsoleReporter, FeatureResult, JsonReport, Reporter, RunSummary, ScenarioResult,
    ScenarioStatus, SilentReporter, StepError, StepResult, StepStatus, Tally,
};
pub use runner::{RunOptions, Runner};
