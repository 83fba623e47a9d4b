//! Core module - sampling tables, plan calculation, project and register

pub mod config;
pub mod project;
pub mod register;
pub mod sampling;

pub use config::{AqlConfig, Config, ConfigError};
pub use project::{Project, ProjectError};
pub use register::{Register, RegisterError};
pub use sampling::{SamplingError, SamplingPlan, SeverityThresholds};
