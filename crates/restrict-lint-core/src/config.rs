//! `restrict-lint.toml` model.
//!
//! ```toml
//! preset = "recommended"
//! fail_on = "warning"
//!
//! [analyzer]
//! exclude = ["**/generated/**"]
//!
//! [rules.restricted-functions]
//! severity = "warning"
//!
//! [rules.restricted-functions.forbidden.date]
//! allowed_context = ["init"]
//! minimum_arguments = 2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::Severity;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Named rule set, `recommended` when absent.
    pub preset: Option<String>,
    /// Lowest severity that fails the run, `error` when absent.
    pub fail_on: Option<String>,
    /// File discovery settings.
    pub analyzer: AnalyzerConfig,
    /// Blocks keyed by rule name.
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path` and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The block for `rule_name`, if present.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Rules without a block, or without `enabled`, are on.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rule(rule_name)
            .and_then(|block| block.enabled)
            .unwrap_or(true)
    }

    /// Explicit `severity` set in the rule's block.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rule(rule_name).and_then(|block| block.severity)
    }

    /// The `fail_on` threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown severity name.
    pub fn fail_on_severity(&self) -> Result<Severity, ConfigError> {
        match self.fail_on.as_deref() {
            None => Ok(Severity::Error),
            Some(name) => Severity::from_name(name).ok_or_else(|| ConfigError::Invalid {
                message: format!("unknown severity `{name}`. Valid values: error, warning, info"),
            }),
        }
    }
}

/// The `[analyzer]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Directory to walk when none is given.
    pub root: PathBuf,
    /// Glob patterns skipped on top of the built-in excludes.
    pub exclude: Vec<String>,
    /// When non-empty, only matching files are checked.
    pub include: Vec<String>,
    /// Honor `.gitignore` while walking.
    pub respect_gitignore: bool,
    /// Worker thread count; rayon's default when absent.
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: Vec::new(),
            include: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

/// A `[rules.<name>]` block.
///
/// Keys other than `enabled` and `severity` land in `options` for the rule
/// to interpret.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// `false` turns the rule off.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Replaces the rule's own severity.
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Rule-specific keys.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Boolean option `key`, or `default` when absent or not a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.options.get(key) {
            Some(toml::Value::Boolean(value)) => *value,
            _ => default,
        }
    }

    /// Table option `key`.
    #[must_use]
    pub fn get_table(&self, key: &str) -> Option<&toml::Table> {
        self.options.get(key)?.as_table()
    }
}

/// Errors loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The text is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not accepted.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What was wrong.
        message: String,
    },
}
