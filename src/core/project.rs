//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::register::Register;

/// Represents a RIT project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .rit/)
    root: PathBuf,
}

impl Project {
    /// Marker directory holding project configuration
    pub const DIR: &'static str = ".rit";

    /// Directory holding the inspection register
    pub const INSPECTIONS_DIR: &'static str = "inspections";

    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(Self::DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if root.join(Self::DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_structure(root)
    }

    /// Force initialization even if .rit/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        Self::write_structure(root)
    }

    fn write_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let rit_dir = root.join(Self::DIR);
        std::fs::create_dir_all(&rit_dir)
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(rit_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::create_dir_all(root.join(Self::INSPECTIONS_DIR))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# RIT Project Configuration

# Operator recorded on new inspections (can be overridden by global config)
# operator: ""

# Register file, relative to the project root
# register: inspections/register.csv

# Default inspection level (I, II, III)
# default_level: II

# Default output format (auto, table, tsv, csv, json, yaml, md)
# default_format: auto

# AQL policy. Critical numbers are used as-is; major and minor are
# fractions of the sample size.
# aql:
#   critical_accept: 0
#   critical_reject: 1
#   major_accept: 0.03
#   major_reject: 0.05
#   minor_accept: 0.06
#   minor_reject: 0.10
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .rit configuration directory
    pub fn rit_dir(&self) -> PathBuf {
        self.root.join(Self::DIR)
    }

    /// Default location of the inspection register
    pub fn default_register_path(&self) -> PathBuf {
        self.root
            .join(Self::INSPECTIONS_DIR)
            .join(Register::DEFAULT_FILE)
    }

    /// Resolve a configured register path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a RIT project (searched from {searched_from:?}). Run 'rit init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("RIT project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
