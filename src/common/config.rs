//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Defaults for `fsbdd run`
    #[serde(default)]
    pub run: RunConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for a test run, overridden by command-line flags
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Feature file or directory to run when no path is given
    #[serde(default = "default_features")]
    pub features: PathBuf,

    /// Workspace root that step directories are resolved under
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Skip all remaining scenarios after the first failure
    #[serde(default)]
    pub stop_on_failure: bool,

    /// Tag expressions applied when none are given on the command line
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            features: default_features(),
            root: default_root(),
            stop_on_failure: false,
            tags: Vec::new(),
        }
    }
}

fn default_features() -> PathBuf {
    PathBuf::from("features")
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Logging settings
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this crate when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Optional file that receives a copy of all log output; a relative
    /// path is taken relative to the current directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
