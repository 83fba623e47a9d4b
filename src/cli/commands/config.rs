//! `rit config` command - Inspect configuration
//!
//! Shows the effective configuration and where it is read from.

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::discover_project;
use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::sampling::{Fraction, SeverityThresholds};
use crate::core::{AqlConfig, Config};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path(PathArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value (e.g. operator, aql.major_accept)
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[&str] = &[
    "operator",
    "register",
    "default_level",
    "default_format",
    "aql.critical_accept",
    "aql.critical_reject",
    "aql.major_accept",
    "aql.major_reject",
    "aql.minor_accept",
    "aql.minor_reject",
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let project = discover_project(global).ok();
    match cmd {
        ConfigCommands::Show(args) => run_show(args, project.as_ref()),
        ConfigCommands::Path(args) => run_path(args, project.as_ref()),
    }
}

fn run_show(args: ShowArgs, project: Option<&Project>) -> Result<()> {
    let config = Config::load_for(project)?;

    if let Some(key) = &args.key {
        if !VALID_KEYS.contains(&key.as_str()) {
            return Err(miette::miette!(
                help = format!("valid keys: {}", VALID_KEYS.join(", ")),
                "Unknown configuration key '{}'",
                key
            ));
        }
        return match config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for key in VALID_KEYS {
        print_config_value(key, config_value(&config, key).as_deref());
    }

    // Surface a bad policy here rather than on the next `plan`
    if let Err(e) = config.thresholds(AqlConfig::default()) {
        println!();
        println!("{} {}", style("!").yellow(), e);
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags");
    println!("  2. Environment variables (RIT_OPERATOR, RIT_REGISTER)");
    println!("  3. Project config (.rit/config.yaml)");
    println!("  4. Global config (~/.config/rit/config.yaml)");

    Ok(())
}

fn run_path(args: PathArgs, project: Option<&Project>) -> Result<()> {
    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    let project_path = project.map(Config::project_config_path);

    if args.project_only {
        let path = project_path.ok_or_else(|| miette::miette!("Not in a RIT project"))?;
        println!("{}", path.display());
    } else if args.global_only {
        println!("{}", global_config_path()?.display());
    } else {
        println!("{}", style("Configuration file paths:").bold());
        println!();
        print_path("Global:", Some(global_config_path()?));
        println!();
        print_path("Project:", project_path);
    }

    Ok(())
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn print_path(label: &str, path: Option<PathBuf>) {
    match path {
        Some(path) => {
            println!("  {} {}", style(label).cyan(), path.display());
            let pad = " ".repeat(label.len() + 3);
            if path.exists() {
                println!("{}{}", pad, style("(exists)").green());
            } else {
                println!("{}{}", pad, style("(not created)").dim());
            }
        }
        None => println!(
            "  {} {}",
            style(label).cyan(),
            style("(not in a RIT project)").dim()
        ),
    }
}

fn config_value(config: &Config, key: &str) -> Option<String> {
    let aql = config.aql.unwrap_or_default();
    match key {
        "operator" => config.operator.clone(),
        "register" => config.register.as_ref().map(|p| p.display().to_string()),
        "default_level" => config.default_level.map(|l| l.to_string()),
        "default_format" => config.default_format.clone(),
        "aql.critical_accept" => Some(
            aql.critical_accept
                .unwrap_or(SeverityThresholds::DEFAULT_CRITICAL_ACCEPT)
                .to_string(),
        ),
        "aql.critical_reject" => Some(
            aql.critical_reject
                .unwrap_or(SeverityThresholds::DEFAULT_CRITICAL_REJECT)
                .to_string(),
        ),
        "aql.major_accept" => Some(
            aql.major_accept
                .map(|f| f.value())
                .unwrap_or(SeverityThresholds::DEFAULT_MAJOR_ACCEPT)
                .to_string(),
        ),
        "aql.major_reject" => Some(
            aql.major_reject
                .map(|f| f.value())
                .unwrap_or(SeverityThresholds::DEFAULT_MAJOR_REJECT)
                .to_string(),
        ),
        "aql.minor_accept" => Some(
            aql.minor_accept
                .map(|f| f.value())
                .unwrap_or(SeverityThresholds::DEFAULT_MINOR_ACCEPT)
                .to_string(),
        ),
        "aql.minor_reject" => Some(
            aql.minor_reject
                .map(|f| f.value())
                .unwrap_or(SeverityThresholds::DEFAULT_MINOR_REJECT)
                .to_string(),
        ),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}
