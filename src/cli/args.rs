//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, init::InitArgs, list::ListArgs,
    plan::PlanArgs, record::RecordArgs, tables::TablesArgs,
};

#[derive(Parser)]
#[command(name = "rit")]
#[command(author, version, about = "Receiving Inspection Toolkit")]
#[command(long_about = "Compute MIL-STD-105E acceptance sampling plans for received lots and keep a plain-text inspection register.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project root (default: auto-detect by finding .rit/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new RIT project
    Init(InitArgs),

    /// Calculate and show the sampling plan for a shipment
    Plan(PlanArgs),

    /// Calculate the plan and save one inspection record to the register
    Record(RecordArgs),

    /// List saved inspection records
    List(ListArgs),

    /// Show the MIL-STD-105E reference tables
    Tables(TablesArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for humans)
    #[default]
    Auto,
    /// Boxed terminal table
    Table,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Resolve `auto` against the configured default format
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        match self {
            OutputFormat::Auto => configured
                .and_then(|s| OutputFormat::from_str(s, true).ok())
                .filter(|f| *f != OutputFormat::Auto)
                .unwrap_or(OutputFormat::Table),
            f => f,
        }
    }
}
