//! Configuration settings for the solver bridge

use crate::error::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Conventional name of the properties file
pub const DEFAULT_PROPERTIES_FILE: &str = "solver.cfg";

/// Solver binary looked up on the search path when none is configured
pub const DEFAULT_EXECUTABLE: &str = "minisat";

/// Properties key naming the solver binary
pub const EXECUTABLE_KEY: &str = "solver.executable";

/// Properties key switching the DIMACS echo on
pub const VERBOSE_KEY: &str = "verbose";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub solver: SolverConfig,
    /// Echo the generated DIMACS text to standard output
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Positional arguments passed before the problem is piped in
    #[serde(default = "default_arguments")]
    pub arguments: Vec<String>,
    /// Upper bound on the solver's run time; unbounded when absent
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

/// minisat takes its input and result files as positional arguments; the
/// device paths point them at the piped standard streams.
fn default_arguments() -> Vec<String> {
    if cfg!(unix) {
        vec!["/dev/stdin".to_string(), "/dev/stdout".to_string()]
    } else {
        Vec::new()
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            arguments: default_arguments(),
            timeout_seconds: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SolverError::Configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings: Settings = serde_yaml::from_str(&content).map_err(|e| {
            SolverError::Configuration(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).map_err(|e| {
            SolverError::Configuration(format!("failed to serialize settings: {}", e))
        })?;

        let write_error = |e: std::io::Error| {
            SolverError::Configuration(format!(
                "failed to write config file {}: {}",
                path.display(),
                e
            ))
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)?;
        Ok(())
    }

    /// Load settings from a `key=value` properties file
    pub fn from_properties_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SolverError::Configuration(format!(
                "failed to read properties file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_properties(&parse_properties(&content))
    }

    /// Build settings from a key-value source.
    ///
    /// Only `solver.executable` and `verbose` are recognised; `verbose` is
    /// true exactly when its value is `true`, ignoring case.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        let mut settings = Settings::default();
        if let Some(executable) = properties.get(EXECUTABLE_KEY) {
            settings.solver.executable = executable.clone();
        }
        if let Some(verbose) = properties.get(VERBOSE_KEY) {
            settings.verbose = verbose.eq_ignore_ascii_case("true");
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.executable.trim().is_empty() {
            return Err(SolverError::Configuration(
                "solver executable must not be empty".to_string(),
            ));
        }
        if self.solver.timeout_seconds == Some(0) {
            return Err(SolverError::Configuration(
                "timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.solver.timeout_seconds.map(Duration::from_secs)
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref executable) = cli_overrides.executable {
            self.solver.executable = executable.clone();
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = Some(timeout);
        }
        if cli_overrides.verbose {
            self.verbose = true;
        }
    }
}

/// Parse `key=value`, `key: value` or `key value` lines. Blank lines and
/// lines starting with `#` or `!` are skipped; later keys win.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let split = line
            .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
            .unwrap_or(line.len());
        let key = line[..split].trim_end();
        let rest = line[split..].trim_start();
        let value = rest
            .strip_prefix('=')
            .or_else(|| rest.strip_prefix(':'))
            .unwrap_or(rest)
            .trim();

        properties.insert(key.to_string(), value.to_string());
    }

    properties
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub executable: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub verbose: bool,
}

/// Where the CLI should read its settings from
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Yaml(PathBuf),
    Properties(PathBuf),
}

impl ConfigSource {
    pub fn load(&self) -> Result<Settings> {
        match self {
            ConfigSource::Yaml(path) => Settings::from_file(path),
            ConfigSource::Properties(path) => Settings::from_properties_file(path),
        }
    }
}
