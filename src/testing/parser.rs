//! Feature file loading
//!
//! Parsing is delegated to the `gherkin` crate; the parsed document is
//! then flattened into the runner's model. Rules are flattened into
//! their scenarios. Scenario outlines and data tables have no meaning for
//! file-operation steps and are rejected with a parse error.

use std::path::{Path, PathBuf};

use gherkin::GherkinEnv;
use walkdir::WalkDir;

use crate::common::paths::is_feature_file;
use crate::common::{Error, Result};

use super::feature::{Feature, Scenario, Step};

/// Read and parse a feature file
pub fn load_feature(path: &Path) -> Result<Feature> {
    let parsed = gherkin::Feature::parse_path(path, GherkinEnv::default()).map_err(|e| match e {
        gherkin::ParseFileError::Reading { source, .. } => Error::FileRead {
            path: path.display().to_string(),
            error: source.to_string(),
        },
        gherkin::ParseFileError::Parsing { source, .. } => Error::parse(
            path,
            source.location.line,
            format!("expected {}", source.expected),
        ),
    })?;
    convert(path, parsed)
}

/// Collect the feature files to run from a file or directory path
///
/// A directory is searched recursively; results are sorted so runs are
/// deterministic.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return Err(Error::NoFeatures(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_file() && is_feature_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoFeatures(path.to_path_buf()));
    }
    tracing::debug!(count = files.len(), root = %path.display(), "Discovered feature files");
    Ok(files)
}

fn convert(path: &Path, parsed: gherkin::Feature) -> Result<Feature> {
    let background = match &parsed.background {
        Some(bg) => steps(path, &bg.steps)?,
        None => Vec::new(),
    };

    let mut scenarios = Vec::new();
    for scenario in &parsed.scenarios {
        scenarios.push(scenario_from(path, scenario, &parsed.tags, Vec::new())?);
    }
    for rule in &parsed.rules {
        let rule_background = match &rule.background {
            Some(bg) => steps(path, &bg.steps)?,
            None => Vec::new(),
        };
        let inherited: Vec<String> = rule.tags.iter().chain(&parsed.tags).cloned().collect();
        for scenario in &rule.scenarios {
            scenarios.push(scenario_from(path, scenario, &inherited, rule_background.clone())?);
        }
    }

    Ok(Feature {
        name: parsed.name.clone(),
        description: parsed.description.as_deref().map(str::trim).map(str::to_string),
        path: path.to_path_buf(),
        tags: parsed.tags.clone(),
        background,
        scenarios,
    })
}

/// `prefix` holds rule background steps, which run after the feature
/// background and before the scenario's own steps
fn scenario_from(
    path: &Path,
    scenario: &gherkin::Scenario,
    inherited_tags: &[String],
    mut prefix: Vec<Step>,
) -> Result<Scenario> {
    let line = scenario.position.line;
    if !scenario.examples.is_empty() {
        return Err(Error::parse(path, line, "Scenario outlines are not supported"));
    }
    prefix.extend(steps(path, &scenario.steps)?);

    Ok(Scenario {
        name: scenario.name.clone(),
        line,
        tags: scenario.tags.iter().chain(inherited_tags).cloned().collect(),
        steps: prefix,
    })
}

fn steps(path: &Path, steps: &[gherkin::Step]) -> Result<Vec<Step>> {
    steps
        .iter()
        .map(|step| {
            if step.table.is_some() {
                return Err(Error::parse(path, step.position.line, "Data tables are not supported"));
            }
            Ok(Step {
                keyword: step.keyword.trim().to_string(),
                text: step.value.clone(),
                doc_string: step.docstring.as_deref().map(doc_string_body),
                line: step.position.line,
            })
        })
        .collect()
}

/// File body from a doc string: one line break is dropped at each end
/// and escaped delimiters are decoded
fn doc_string_body(raw: &str) -> String {
    let body = raw
        .strip_prefix("\r\n")
        .or_else(|| raw.strip_prefix('\n'))
        .unwrap_or(raw);
    let body = body
        .strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body);
    body.replace(r#"\"\"\""#, r#"""""#).replace(r"\`\`\`", "```")
}
