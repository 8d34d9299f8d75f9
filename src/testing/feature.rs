//! Feature file data model
//!
//! The parsed form of a Gherkin feature file: an optional background and
//! an ordered list of scenarios, each an ordered list of steps.

use std::path::PathBuf;

/// A parsed feature file
#[derive(Debug, Clone)]
pub struct Feature {
    /// Name following the `Feature:` keyword
    pub name: String,
    /// Free text between the `Feature:` line and the first section
    pub description: Option<String>,
    /// File the feature was loaded from
    pub path: PathBuf,
    /// Tags declared above `Feature:`
    pub tags: Vec<String>,
    /// Steps run before every scenario
    pub background: Vec<Step>,
    /// Scenarios in declaration order
    pub scenarios: Vec<Scenario>,
}

/// A single scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    /// 1-based line of the `Scenario:` keyword
    pub line: usize,
    /// Own tags followed by those inherited from the rule and feature,
    /// without the leading `@`
    pub tags: Vec<String>,
    pub steps: Vec<Step>,
}

/// One step line with its optional doc string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Keyword as written (`Given`, `And`, `*`, ...)
    pub keyword: String,
    /// Sentence after the keyword
    pub text: String,
    /// Content of an attached `"""` block
    pub doc_string: Option<String>,
    /// 1-based line of the step
    pub line: usize,
}

impl Scenario {
    /// Background steps followed by the scenario's own steps
    pub fn steps_with_background<'a>(
        &'a self,
        feature: &'a Feature,
    ) -> impl Iterator<Item = &'a Step> + 'a {
        feature.background.iter().chain(self.steps.iter())
    }
}
