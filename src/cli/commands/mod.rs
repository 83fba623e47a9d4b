//! CLI command implementations

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod plan;
pub mod record;
pub mod tables;
