//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::sampling::{Fraction, InspectionLevel, SamplingError, SeverityThresholds};
use crate::core::Project;

/// Errors raised while reading configuration files
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    #[diagnostic(code(rit::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path:?}: {message}")]
    #[diagnostic(
        code(rit::config::parse),
        help("valid keys: operator, register, default_level, default_format, aql.{{critical,major,minor}}_{{accept,reject}}")
    )]
    Parse { path: PathBuf, message: String },
}

/// AQL policy overrides. Unset keys fall back to the baseline policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AqlConfig {
    pub critical_accept: Option<u32>,
    pub critical_reject: Option<u32>,
    pub major_accept: Option<Fraction>,
    pub major_reject: Option<Fraction>,
    pub minor_accept: Option<Fraction>,
    pub minor_reject: Option<Fraction>,
}

fn fraction_or(value: Option<Fraction>, default: f64) -> f64 {
    value.map(|f| f.value()).unwrap_or(default)
}

impl AqlConfig {
    /// Merge another policy into this one (other takes precedence)
    pub fn merge(&mut self, other: AqlConfig) {
        self.critical_accept = other.critical_accept.or(self.critical_accept);
        self.critical_reject = other.critical_reject.or(self.critical_reject);
        self.major_accept = other.major_accept.or(self.major_accept);
        self.major_reject = other.major_reject.or(self.major_reject);
        self.minor_accept = other.minor_accept.or(self.minor_accept);
        self.minor_reject = other.minor_reject.or(self.minor_reject);
    }

    /// Validated thresholds with unset keys filled from the baseline
    pub fn thresholds(&self) -> Result<SeverityThresholds, SamplingError> {
        SeverityThresholds::new(
            self.critical_accept
                .unwrap_or(SeverityThresholds::DEFAULT_CRITICAL_ACCEPT),
            self.critical_reject
                .unwrap_or(SeverityThresholds::DEFAULT_CRITICAL_REJECT),
            (
                fraction_or(self.major_accept, SeverityThresholds::DEFAULT_MAJOR_ACCEPT),
                fraction_or(self.major_reject, SeverityThresholds::DEFAULT_MAJOR_REJECT),
            ),
            (
                fraction_or(self.minor_accept, SeverityThresholds::DEFAULT_MINOR_ACCEPT),
                fraction_or(self.minor_reject, SeverityThresholds::DEFAULT_MINOR_REJECT),
            ),
        )
    }
}

/// RIT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Operator recorded on new inspections
    pub operator: Option<String>,

    /// Register file (relative paths resolve against the project root)
    pub register: Option<PathBuf>,

    /// Inspection level used when none is given
    pub default_level: Option<InspectionLevel>,

    /// Default output format
    pub default_format: Option<String>,

    /// AQL policy overrides
    pub aql: Option<AqlConfig>,
}

impl Config {
    /// Load configuration for a known project (or none), merging sources in
    /// priority order. A file that exists but does not parse is an error.
    pub fn load_for(project: Option<&Project>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/rit/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path)? {
                config.merge(global);
            }
        }

        // 3. Project config (.rit/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&Self::project_config_path(project))? {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(operator) = std::env::var("RIT_OPERATOR") {
            config.operator = Some(operator);
        }
        if let Ok(register) = std::env::var("RIT_REGISTER") {
            config.register = Some(PathBuf::from(register));
        }

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// Parse one config file. Files with only comments and blank lines (the
    /// `rit init` template) hold no settings.
    fn parse(path: &Path, contents: &str) -> Result<Option<Config>, ConfigError> {
        let has_settings = contents.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#') && line != "---"
        });
        if !has_settings {
            tracing::debug!(path = %path.display(), "config file has no settings");
            return Ok(None);
        }

        let config = serde_yml::from_str::<Config>(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to a project's config file
    pub fn project_config_path(project: &Project) -> PathBuf {
        project.rit_dir().join("config.yaml")
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.operator.is_some() {
            self.operator = other.operator;
        }
        if other.register.is_some() {
            self.register = other.register;
        }
        if other.default_level.is_some() {
            self.default_level = other.default_level;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if let Some(aql) = other.aql {
            self.aql.get_or_insert_with(AqlConfig::default).merge(aql);
        }
    }

    /// Inspection level, defaulting to II
    pub fn level(&self) -> InspectionLevel {
        self.default_level.unwrap_or_default()
    }

    /// Thresholds from the configured policy with CLI overrides applied on top
    pub fn thresholds(&self, overrides: AqlConfig) -> Result<SeverityThresholds, SamplingError> {
        let mut aql = self.aql.unwrap_or_default();
        aql.merge(overrides);
        aql.thresholds()
    }

    /// Resolve the register path for a project
    pub fn register_path(&self, project: &Project) -> PathBuf {
        match &self.register {
            Some(path) => project.resolve(path),
            None => project.default_register_path(),
        }
    }
}
