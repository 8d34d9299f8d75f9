//! Scenario runner
//!
//! Executes feature files against the step registry. Each scenario goes
//! through the same phases: every step is matched first, then the
//! resolved actions are invoked in order and their outcomes recorded.
//! The first failing step skips the rest of its scenario.

use std::path::PathBuf;

use crate::common::{Error, Result};
use crate::steps::{Action, Registry, Workspace};

use super::feature::{Feature, Scenario, Step};
use super::filter::ScenarioFilter;
use super::parser::load_feature;
use super::report::{
    FeatureResult, Reporter, RunSummary, ScenarioResult, ScenarioStatus, StepError, StepResult,
    StepStatus,
};

/// Options controlling a run
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Skip all remaining scenarios after the first one that fails
    pub stop_on_failure: bool,
    /// Match steps without invoking any handler
    pub dry_run: bool,
    /// Which scenarios to run
    pub filter: ScenarioFilter,
}

/// Runs scenarios against an immutable registry
pub struct Runner<'a> {
    registry: &'a Registry,
    workspace: Workspace,
    options: RunOptions,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a Registry, workspace: Workspace, options: RunOptions) -> Self {
        Self {
            registry,
            workspace,
            options,
        }
    }

    /// Load and run every feature file in order
    ///
    /// A file that cannot be read or parsed aborts the run; step failures
    /// never do.
    pub async fn run_files(
        &self,
        paths: &[PathBuf],
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary> {
        let mut features = Vec::with_capacity(paths.len());
        for path in paths {
            features.push(load_feature(path)?);
        }
        Ok(self.run_features(&features, reporter).await)
    }

    /// Run already-parsed features
    pub async fn run_features(
        &self,
        features: &[Feature],
        reporter: &mut dyn Reporter,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut halted = false;

        for feature in features {
            let selected: Vec<&Scenario> = feature
                .scenarios
                .iter()
                .filter(|s| self.options.filter.matches(s))
                .collect();
            if selected.is_empty() {
                tracing::debug!(feature = %feature.name, "No scenarios selected");
                continue;
            }

            reporter.feature_started(feature);
            let mut results = Vec::with_capacity(selected.len());

            for scenario in selected {
                reporter.scenario_started(scenario);
                let result = if halted {
                    skipped_scenario(feature, scenario)
                } else {
                    self.run_scenario(feature, scenario).await
                };

                for step in &result.steps {
                    reporter.step_finished(step);
                }
                reporter.scenario_finished(&result);

                if self.options.stop_on_failure && result.status.is_failure() {
                    tracing::info!(scenario = %scenario.name, "Stopping after failed scenario");
                    halted = true;
                }
                results.push(result);
            }

            summary.features.push(FeatureResult {
                name: feature.name.clone(),
                path: feature.path.clone(),
                scenarios: results,
            });
        }

        reporter.run_finished(&summary);
        summary
    }

    /// Run one scenario, background steps first
    pub async fn run_scenario(&self, feature: &Feature, scenario: &Scenario) -> ScenarioResult {
        let steps: Vec<&Step> = scenario.steps_with_background(feature).collect();
        tracing::debug!(scenario = %scenario.name, steps = steps.len(), "Running scenario");

        // Matching
        let resolved: Vec<Result<Action>> = steps
            .iter()
            .map(|step| self.registry.resolve(&step.text, step.doc_string.as_deref()))
            .collect();

        let unbound = resolved.iter().any(|r| r.is_err());
        if unbound || self.options.dry_run {
            let results = steps
                .iter()
                .zip(&resolved)
                .map(|(step, outcome)| match outcome {
                    Ok(_) => record(step, StepStatus::Skipped, None),
                    Err(e) => record(step, unbound_status(e), Some(e)),
                })
                .collect();
            return ScenarioResult::from_steps(scenario, results);
        }

        // Invoking and recording
        let mut results = Vec::with_capacity(steps.len());
        let mut failed = false;
        for (step, action) in steps.iter().zip(resolved.iter().flatten()) {
            if failed {
                results.push(record(step, StepStatus::Skipped, None));
                continue;
            }
            match self.workspace.execute(action).await {
                Ok(()) => results.push(record(step, StepStatus::Passed, None)),
                Err(e) => {
                    tracing::warn!(line = step.line, error = %e, "Step failed");
                    results.push(record(step, StepStatus::Failed, Some(&e)));
                    failed = true;
                }
            }
        }

        ScenarioResult::from_steps(scenario, results)
    }
}

fn skipped_scenario(feature: &Feature, scenario: &Scenario) -> ScenarioResult {
    let steps = scenario
        .steps_with_background(feature)
        .map(|step| record(step, StepStatus::Skipped, None))
        .collect();
    ScenarioResult {
        name: scenario.name.clone(),
        line: scenario.line,
        status: ScenarioStatus::Skipped,
        steps,
    }
}

fn unbound_status(e: &Error) -> StepStatus {
    match e {
        Error::UndefinedStep(_) => StepStatus::Undefined,
        Error::AmbiguousStep { .. } => StepStatus::Ambiguous,
        _ => StepStatus::Failed,
    }
}

fn record(step: &Step, status: StepStatus, error: Option<&Error>) -> StepResult {
    StepResult {
        keyword: step.keyword.clone(),
        text: step.text.clone(),
        line: step.line,
        status,
        doc_string: step.doc_string.clone(),
        error: error.map(StepError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::report::SilentReporter;
    use tempfile::TempDir;

    const LIFECYCLE: &str = r#"
Feature: Module files

  Scenario: Create then delete
    Given I create the file "main.tf" in the directory "modules" with content:
      """
      resource block
      """
    When I delete the file "main.tf" from the directory "modules"
    Then the file "main.tf" should not exist in the directory "modules"
"#;

    const MISSING_DELETE: &str = r#"
Feature: Module files

  Scenario: Forgot to delete
    Given I create the file "main.tf" in the directory "modules" with content:
      """
      resource block
      """
    Then the file "main.tf" should not exist in the directory "modules"
    And I delete the file "main.tf" from the directory "modules"
"#;

    fn feature(source: &str) -> Feature {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("test.feature");
        std::fs::write(&path, source).unwrap();
        load_feature(&path).unwrap()
    }

    async fn run(source: &str, options: RunOptions) -> (TempDir, RunSummary) {
        let temp = tempfile::tempdir().unwrap();
        let registry = Registry::new().unwrap();
        let runner = Runner::new(&registry, Workspace::new(temp.path()), options);
        let summary = runner
            .run_features(&[feature(source)], &mut SilentReporter)
            .await;
        (temp, summary)
    }

    fn statuses(summary: &RunSummary) -> Vec<StepStatus> {
        summary
            .scenarios()
            .flat_map(|s| s.steps.iter().map(|st| st.status))
            .collect()
    }

    #[tokio::test]
    async fn test_lifecycle_passes() {
        let (temp, summary) = run(LIFECYCLE, RunOptions::default()).await;
        assert!(summary.passed());
        assert_eq!(statuses(&summary), vec![StepStatus::Passed; 3]);
        assert!(!temp.path().join("modules/main.tf").exists());
        assert!(temp.path().join("modules").is_dir());
    }

    #[tokio::test]
    async fn test_missing_delete_fails_at_verify() {
        let (temp, summary) = run(MISSING_DELETE, RunOptions::default()).await;
        assert!(!summary.passed());
        assert_eq!(
            statuses(&summary),
            vec![StepStatus::Passed, StepStatus::Failed, StepStatus::Skipped]
        );

        let failed = &summary.features[0].scenarios[0].steps[1];
        let err = failed.error.as_ref().unwrap();
        assert_eq!(err.code, "ASSERTION_FAILED");
        // The skipped delete never ran
        assert!(temp.path().join("modules/main.tf").exists());
    }

    #[tokio::test]
    async fn test_undefined_step_runs_nothing() {
        let source = r#"
Feature: f
  Scenario: typo
    Given I create the file "a" in the directory "d" with content:
      """
      x
      """
    When I shred the file "a" in the directory "d"
"#;
        let (temp, summary) = run(source, RunOptions::default()).await;
        assert_eq!(
            statuses(&summary),
            vec![StepStatus::Skipped, StepStatus::Undefined]
        );
        assert_eq!(summary.features[0].scenarios[0].status, ScenarioStatus::Undefined);
        assert!(!summary.passed());
        assert!(!temp.path().join("d").exists());
    }

    #[tokio::test]
    async fn test_missing_doc_string_fails_matching() {
        let source = r#"
Feature: f
  Scenario: no body
    Given I create the file "a" in the directory "d" with content:
"#;
        let (_temp, summary) = run(source, RunOptions::default()).await;
        assert_eq!(statuses(&summary), vec![StepStatus::Failed]);
        let err = summary.features[0].scenarios[0].steps[0].error.as_ref().unwrap();
        assert_eq!(err.code, "MISSING_DOC_STRING");
    }

    #[tokio::test]
    async fn test_delete_missing_file_fails() {
        let source = r#"
Feature: f
  Scenario: nothing to delete
    When I delete the file "a" from the directory "d"
"#;
        let (_temp, summary) = run(source, RunOptions::default()).await;
        assert_eq!(statuses(&summary), vec![StepStatus::Failed]);
        let err = summary.features[0].scenarios[0].steps[0].error.as_ref().unwrap();
        assert_eq!(err.code, "IO_ERROR");
    }

    #[tokio::test]
    async fn test_continue_after_failed_scenario() {
        let source = format!(
            "{}\n  Scenario: Second\n    Then the file \"x\" should not exist in the directory \"y\"\n",
            MISSING_DELETE
        );
        let (_temp, summary) = run(&source, RunOptions::default()).await;
        let scenarios: Vec<ScenarioStatus> = summary.scenarios().map(|s| s.status).collect();
        assert_eq!(scenarios, vec![ScenarioStatus::Failed, ScenarioStatus::Passed]);
    }

    #[tokio::test]
    async fn test_stop_on_failure_skips_remaining() {
        let source = format!(
            "{}\n  Scenario: Second\n    Then the file \"x\" should not exist in the directory \"y\"\n",
            MISSING_DELETE
        );
        let options = RunOptions {
            stop_on_failure: true,
            ..RunOptions::default()
        };
        let (_temp, summary) = run(&source, options).await;
        let scenarios: Vec<ScenarioStatus> = summary.scenarios().map(|s| s.status).collect();
        assert_eq!(scenarios, vec![ScenarioStatus::Failed, ScenarioStatus::Skipped]);
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };
        let (temp, summary) = run(LIFECYCLE, options).await;
        assert!(summary.passed());
        assert_eq!(statuses(&summary), vec![StepStatus::Skipped; 3]);
        assert!(!temp.path().join("modules").exists());
    }

    #[tokio::test]
    async fn test_background_runs_before_each_scenario() {
        let source = r#"
Feature: f
  Background:
    Given I create the file "seed.txt" in the directory "bg" with content:
      """
      seed
      """

  Scenario: one
    When I delete the file "seed.txt" from the directory "bg"

  Scenario: two
    When I delete the file "seed.txt" from the directory "bg"
"#;
        let (_temp, summary) = run(source, RunOptions::default()).await;
        assert!(summary.passed());
        assert_eq!(summary.scenario_tally().passed, 2);
        assert_eq!(summary.step_tally().total, 4);
    }

    #[tokio::test]
    async fn test_filter_excludes_scenarios() {
        let source = r#"
Feature: f
  @keep
  Scenario: kept
    Then the file "x" should not exist in the directory "y"

  Scenario: dropped
    When I delete the file "x" from the directory "y"
"#;
        let options = RunOptions {
            filter: ScenarioFilter::new(&["@keep".to_string()], None).unwrap(),
            ..RunOptions::default()
        };
        let (_temp, summary) = run(source, options).await;
        assert!(summary.passed());
        assert_eq!(summary.scenario_tally().total, 1);
    }

    #[tokio::test]
    async fn test_run_files_reports_parse_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.feature");
        std::fs::write(&path, "Scenario: no feature\n").unwrap();

        let registry = Registry::new().unwrap();
        let runner = Runner::new(&registry, Workspace::new(temp.path()), RunOptions::default());
        let err = runner
            .run_files(&[path], &mut SilentReporter)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
