//! Scan filter configuration.
//!
//! Lets users exclude files from analysis and organization via a TOML
//! file. Supported rules: a hidden-file toggle, exact filenames, glob
//! patterns, extensions, and regex patterns. Rules are compiled once
//! into [`CompiledFilters`] so pattern parsing happens (and fails) at
//! load time, not per file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! include_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak"]
//! regex = ["^~"]
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from loading or compiling filter configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A glob pattern failed to parse.
    InvalidGlobPattern(String),
    /// A regex pattern failed to compile.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Filter configuration as deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Root-level filter rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether hidden files (names starting with ".") are scanned.
    /// Defaults to false.
    #[serde(default)]
    pub include_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the filename (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions to exclude, without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the filename.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl FilterConfig {
    /// Loads configuration from `path`, or returns the defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compiles the textual rules into matchers, failing on the first
    /// invalid pattern.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        let rules = &self.filters;

        let patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|p| Pattern::new(p).map_err(|_| ConfigError::InvalidGlobPattern(p.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = rules
            .exclude
            .regex
            .iter()
            .map(|r| {
                Regex::new(r).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: r.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledFilters {
            include_hidden_files: rules.include_hidden_files,
            filenames: rules.exclude.filenames.iter().cloned().collect(),
            extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }
}

/// Pre-parsed filter rules ready for per-file checks.
#[derive(Debug)]
pub struct CompiledFilters {
    include_hidden_files: bool,
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledFilters {
    /// Filters that include everything, hidden files too. This is the
    /// engine's default: the scanner contract covers every top-level
    /// regular file.
    pub fn permissive() -> Self {
        Self {
            include_hidden_files: true,
            filenames: HashSet::new(),
            extensions: HashSet::new(),
            patterns: Vec::new(),
            regexes: Vec::new(),
        }
    }

    /// Decides whether the file at `path` participates in analysis.
    /// Matching is on the filename only.
    pub fn should_include(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            return false;
        };

        if !self.include_hidden_files && name.starts_with('.') {
            return false;
        }
        if self.filenames.contains(&name) {
            return false;
        }
        if self
            .extensions
            .contains(&crate::scanner::extension_of(&name))
        {
            return false;
        }
        if self.patterns.iter().any(|p| p.matches(&name)) {
            return false;
        }
        if self.regexes.iter().any(|r| r.is_match(&name)) {
            return false;
        }
        true
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        FilterConfig::default()
            .compile()
            .expect("default filter rules always compile")
    }
}
