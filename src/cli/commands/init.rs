//! `rit init` command - Initialize a new RIT project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Force initialization even if .rit/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            tracing::info!(root = %project.root().display(), "initialized project");
            println!(
                "{} Initialized RIT project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Set the default operator in .rit/config.yaml",
                style("operator: <name>").yellow()
            );
            println!(
                "  {} Calculate a sampling plan",
                style("rit plan --medium 120").yellow()
            );
            println!(
                "  {} Save an inspection record",
                style("rit record -i").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} RIT project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("rit init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let entries = [
        format!("{}/", Project::DIR),
        format!("{}/config.yaml", Project::DIR),
        format!("{}/", Project::INSPECTIONS_DIR),
    ];

    for entry in &entries {
        let full_path = root.join(entry.trim_end_matches('/'));
        if full_path.exists() {
            println!("  {}", style(entry).dim());
        }
    }
}
