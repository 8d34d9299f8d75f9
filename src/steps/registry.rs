//! Step pattern registry
//!
//! The registry is built once at start-up and handed to the runner. Each
//! binding pairs a [`StepKind`] with the regular expression that
//! recognises it; resolving a step turns its text into a typed [`Action`]
//! so dispatch to the handlers is an exhaustive match rather than a
//! lookup by string.

use regex::Regex;
use serde::Serialize;

use crate::common::{Error, Result};

/// Capture group holding the file name in every pattern
const FILE_GROUP: &str = "file";
/// Capture group holding the directory in every pattern
const DIR_GROUP: &str = "dir";

/// The closed set of step kinds the harness knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Write a file (creating its directory) from the step's doc string
    CreateFile,
    /// Remove an existing file
    DeleteFile,
    /// Assert that a file does not exist
    VerifyAbsent,
}

impl StepKind {
    /// Every kind, in the order the default registry binds them
    pub const ALL: [StepKind; 3] = [
        StepKind::CreateFile,
        StepKind::DeleteFile,
        StepKind::VerifyAbsent,
    ];

    /// The sentence this kind is bound to in the default registry
    pub fn default_pattern(self) -> &'static str {
        match self {
            StepKind::CreateFile => {
                r#"^I create the file "(?P<file>[^"]+)" in the directory "(?P<dir>[^"]*)" with content:$"#
            }
            StepKind::DeleteFile => {
                r#"^I delete the file "(?P<file>[^"]+)" from the directory "(?P<dir>[^"]*)"$"#
            }
            StepKind::VerifyAbsent => {
                r#"^the file "(?P<file>[^"]+)" should not exist in the directory "(?P<dir>[^"]*)"$"#
            }
        }
    }

    /// Whether the step consumes an attached doc string
    pub fn takes_doc_string(self) -> bool {
        matches!(self, StepKind::CreateFile)
    }
}

/// A step resolved to its kind with all parameters extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateFile {
        directory: String,
        file_name: String,
        content: String,
    },
    DeleteFile {
        directory: String,
        file_name: String,
    },
    VerifyAbsent {
        directory: String,
        file_name: String,
    },
}

impl Action {
    /// The kind of step this action was resolved from
    pub fn kind(&self) -> StepKind {
        match self {
            Action::CreateFile { .. } => StepKind::CreateFile,
            Action::DeleteFile { .. } => StepKind::DeleteFile,
            Action::VerifyAbsent { .. } => StepKind::VerifyAbsent,
        }
    }
}

/// A compiled pattern bound to a step kind
#[derive(Debug)]
pub struct Binding {
    kind: StepKind,
    regex: Regex,
}

impl Binding {
    /// Compile `pattern` for `kind`
    ///
    /// The pattern must define the `file` and `dir` capture groups.
    pub fn new(kind: StepKind, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        for group in [FILE_GROUP, DIR_GROUP] {
            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(Error::Config(format!(
                    "Step pattern '{}' has no '{}' capture group",
                    pattern, group
                )));
            }
        }
        Ok(Self { kind, regex })
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Extract `(file_name, directory)` if the text matches this binding
    fn captures(&self, text: &str) -> Option<(String, String)> {
        let caps = self.regex.captures(text)?;
        let file = caps.name(FILE_GROUP)?.as_str().to_string();
        let dir = caps.name(DIR_GROUP)?.as_str().to_string();
        Some((file, dir))
    }
}

/// Immutable set of step bindings
#[derive(Debug)]
pub struct Registry {
    bindings: Vec<Binding>,
}

impl Registry {
    /// Build the registry with the standard sentence for every step kind
    pub fn new() -> Result<Self> {
        Self::with_patterns(StepKind::ALL.iter().map(|kind| (*kind, kind.default_pattern())))
    }

    /// Build a registry from explicit `(kind, pattern)` pairs
    pub fn with_patterns<'a, I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (StepKind, &'a str)>,
    {
        let bindings = patterns
            .into_iter()
            .map(|(kind, pattern)| Binding::new(kind, pattern))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = bindings.len(), "Step registry built");
        Ok(Self { bindings })
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Match step text against every binding and extract its parameters
    ///
    /// Zero matches is an undefined step and several matches an ambiguous
    /// one; both are reported before any handler runs.
    pub fn resolve(&self, text: &str, doc_string: Option<&str>) -> Result<Action> {
        let text = text.trim();
        let mut matches = self
            .bindings
            .iter()
            .filter_map(|binding| binding.captures(text).map(|caps| (binding, caps)));

        let (binding, (file_name, directory)) = match matches.next() {
            Some(found) => found,
            None => return Err(Error::UndefinedStep(text.to_string())),
        };

        let others: Vec<&str> = matches.map(|(b, _)| b.pattern()).collect();
        if !others.is_empty() {
            let mut patterns = vec![binding.pattern()];
            patterns.extend(others);
            return Err(Error::ambiguous_step(text, &patterns));
        }

        tracing::debug!(kind = ?binding.kind, %file_name, %directory, "Step matched");

        let action = match binding.kind {
            StepKind::CreateFile => {
                let content = doc_string
                    .ok_or_else(|| Error::MissingDocString(text.to_string()))?
                    .to_string();
                Action::CreateFile {
                    directory,
                    file_name,
                    content,
                }
            }
            StepKind::DeleteFile => Action::DeleteFile {
                directory,
                file_name,
            },
            StepKind::VerifyAbsent => Action::VerifyAbsent {
                directory,
                file_name,
            },
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new().unwrap()
    }

    #[test]
    fn test_default_registry_binds_every_kind() {
        let reg = registry();
        let kinds: Vec<StepKind> = reg.bindings().iter().map(|b| b.kind()).collect();
        assert_eq!(kinds, StepKind::ALL.to_vec());
    }

    #[test]
    fn test_resolve_create() {
        let action = registry()
            .resolve(
                r#"I create the file "main.tf" in the directory "modules" with content:"#,
                Some("resource block"),
            )
            .unwrap();
        assert_eq!(
            action,
            Action::CreateFile {
                directory: "modules".to_string(),
                file_name: "main.tf".to_string(),
                content: "resource block".to_string(),
            }
        );
        assert_eq!(action.kind(), StepKind::CreateFile);
    }

    #[test]
    fn test_resolve_delete_and_verify() {
        let reg = registry();
        let delete = reg
            .resolve(r#"I delete the file "main.tf" from the directory "modules""#, None)
            .unwrap();
        assert!(matches!(delete, Action::DeleteFile { ref file_name, .. } if file_name == "main.tf"));

        let verify = reg
            .resolve(
                r#"the file "main.tf" should not exist in the directory "modules""#,
                None,
            )
            .unwrap();
        match verify {
            Action::VerifyAbsent {
                directory,
                file_name,
            } => {
                assert_eq!(directory, "modules");
                assert_eq!(file_name, "main.tf");
            }
            other => panic!("Expected VerifyAbsent, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let action = registry()
            .resolve(
                "  I delete the file \"a\" from the directory \"b\"  ",
                None,
            )
            .unwrap();
        assert_eq!(action.kind(), StepKind::DeleteFile);
    }

    #[test]
    fn test_doc_string_ignored_for_delete() {
        let action = registry()
            .resolve(
                r#"I delete the file "a" from the directory "b""#,
                Some("ignored"),
            )
            .unwrap();
        assert_eq!(action.kind(), StepKind::DeleteFile);
    }

    #[test]
    fn test_empty_directory_means_root() {
        let action = registry()
            .resolve(r#"I delete the file "a" from the directory """#, None)
            .unwrap();
        assert!(matches!(action, Action::DeleteFile { ref directory, .. } if directory.is_empty()));
    }

    #[test]
    fn test_undefined_step() {
        let err = registry()
            .resolve(r#"I rename the file "a" in the directory "b""#, None)
            .unwrap_err();
        assert!(matches!(err, Error::UndefinedStep(_)));
        assert_eq!(err.code(), "UNDEFINED_STEP");
    }

    #[test]
    fn test_empty_file_name_is_undefined() {
        let err = registry()
            .resolve(r#"I delete the file "" from the directory "b""#, None)
            .unwrap_err();
        assert!(matches!(err, Error::UndefinedStep(_)));
    }

    #[test]
    fn test_create_without_doc_string() {
        let err = registry()
            .resolve(
                r#"I create the file "a" in the directory "b" with content:"#,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, Error::MissingDocString(_)));
    }

    #[test]
    fn test_ambiguous_step() {
        let reg = Registry::with_patterns([
            (StepKind::DeleteFile, StepKind::DeleteFile.default_pattern()),
            (
                StepKind::VerifyAbsent,
                r#"^I delete the file "(?P<file>[^"]+)" from (?:the )?directory "(?P<dir>[^"]*)"$"#,
            ),
        ])
        .unwrap();
        let err = reg
            .resolve(r#"I delete the file "a" from the directory "b""#, None)
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousStep { .. }));
    }

    #[test]
    fn test_pattern_without_groups_rejected() {
        let err = Registry::with_patterns([(StepKind::DeleteFile, r"^delete (\w+)$")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = Registry::with_patterns([(StepKind::DeleteFile, r"^(unclosed$")]).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }
}
