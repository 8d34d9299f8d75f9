//! Scenario selection by tag expression and name

use gherkin::tagexpr::TagOperation;
use regex::Regex;

use crate::common::{Error, Result};

use super::feature::Scenario;

/// Decides which scenarios run
///
/// Tag expressions use cucumber syntax (`@smoke and not @wip`); every
/// expression given must hold. An empty filter selects all.
#[derive(Debug, Default)]
pub struct ScenarioFilter {
    tags: Vec<TagOperation>,
    name: Option<Regex>,
}

impl ScenarioFilter {
    pub fn new(tag_expressions: &[String], name: Option<&str>) -> Result<Self> {
        let tags = tag_expressions
            .iter()
            .map(|expr| expr.trim())
            .filter(|expr| !expr.is_empty())
            .map(|expr| {
                expr.parse::<TagOperation>().map_err(|e| {
                    Error::Config(format!("Invalid tag expression '{}': {}", expr, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let name = name.map(Regex::new).transpose()?;

        Ok(Self { tags, name })
    }

    pub fn matches(&self, scenario: &Scenario) -> bool {
        let tags_ok = self.tags.iter().all(|op| op.eval(scenario.tags.iter()));
        let name_ok = self
            .name
            .as_ref()
            .map_or(true, |re| re.is_match(&scenario.name));
        tags_ok && name_ok
    }
}
