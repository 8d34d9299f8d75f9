//! Error types for fsbdd
//!
//! Every failure a step can produce maps onto one variant here, so the
//! report can show the step text next to an actionable message.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fsbdd
#[derive(Error, Debug)]
pub enum Error {
    // === File System Errors ===
    #[error("Failed to {action} '{}': {source}", .path.display())]
    FileOperation {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Assertion Errors ===
    #[error("Expected '{}' to be absent, but it exists", .path.display())]
    FilePresent { path: PathBuf },

    // === Step Binding Errors ===
    #[error("Undefined step: no pattern matches '{0}'. Run 'fsbdd steps' to list the known patterns")]
    UndefinedStep(String),

    #[error("Ambiguous step '{text}' matches several patterns: {patterns}")]
    AmbiguousStep { text: String, patterns: String },

    #[error("Step '{0}' needs a doc string (\"\"\") holding the file content")]
    MissingDocString(String),

    #[error("Invalid step pattern: {0}")]
    Pattern(#[from] regex::Error),

    // === Feature File Errors ===
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("No feature files found under '{}'", .0.display())]
    NoFeatures(PathBuf),

    // === Run Outcome ===
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an IO error with the action and path that produced it
    pub fn file_operation(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::FileOperation {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an ambiguous step error listing every matching pattern
    pub fn ambiguous_step<S: AsRef<str>>(text: &str, patterns: &[S]) -> Self {
        Self::AmbiguousStep {
            text: text.to_string(),
            patterns: patterns.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }

    /// Create a parse error at a given line of a feature file
    pub fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Short machine-readable code used by the JSON report
    pub fn code(&self) -> &'static str {
        match self {
            Error::FileOperation { .. } | Error::Io(_) | Error::FileRead { .. } => "IO_ERROR",
            Error::FilePresent { .. } => "ASSERTION_FAILED",
            Error::UndefinedStep(_) => "UNDEFINED_STEP",
            Error::AmbiguousStep { .. } => "AMBIGUOUS_STEP",
            Error::MissingDocString(_) => "MISSING_DOC_STRING",
            Error::Parse { .. } => "PARSE_ERROR",
            Error::NoFeatures(_) => "NO_FEATURES",
            Error::Pattern(_) | Error::Config(_) | Error::ConfigParse(_) => "CONFIG_ERROR",
            Error::ScenariosFailed { .. } => "SCENARIOS_FAILED",
            Error::Json(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_operation_message_names_path() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::file_operation("write", Path::new("modules/main.tf"), io);
        let msg = err.to_string();
        assert!(msg.contains("write"));
        assert!(msg.contains("modules/main.tf"));
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_ambiguous_lists_patterns() {
        let err = Error::ambiguous_step("step", &["a", "b"]);
        assert!(err.to_string().contains("a, b"));
    }
}
