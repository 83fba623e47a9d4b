//! `rit list` command - Show saved inspection records

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{discover_project, opt_to_string, truncate_str};
use crate::cli::table::{render, TableData};
use crate::cli::GlobalOpts;
use crate::core::{Config, Register};
use crate::entities::inspection::{InspectionRecord, Presentation};

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by supplier (case-insensitive substring)
    #[arg(long, short = 's')]
    pub supplier: Option<String>,

    /// Filter by fragrance (case-insensitive substring)
    #[arg(long)]
    pub fragrance: Option<String>,

    /// Newest records first
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,

    /// Register file (default: config register, then inspections/register.csv)
    #[arg(long)]
    pub register: Option<PathBuf>,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = discover_project(global);
    let config = Config::load_for(project.as_ref().ok())?;
    let register_path = match args.register {
        Some(ref path) => path.clone(),
        None => config.register_path(&project?),
    };

    let register = Register::open(register_path);
    let mut records = filter_records(register.records().into_diagnostic()?, &args);
    if args.reverse {
        records.reverse();
    }
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    if records.is_empty() {
        println!("No inspection records found.");
        return Ok(());
    }

    let format = global.format.resolve(config.default_format.as_deref());
    let out = render(&records, &record_table(&records), format)?;
    print!("{}", out);

    if !global.quiet && matches!(format, crate::cli::OutputFormat::Table) {
        println!(
            "{} record(s) in {}",
            style(records.len()).cyan(),
            style(register.path().display()).dim()
        );
    }

    Ok(())
}

fn filter_records(records: Vec<InspectionRecord>, args: &ListArgs) -> Vec<InspectionRecord> {
    let matches = |field: &str, needle: &Option<String>| match needle {
        Some(needle) => field.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    };

    records
        .into_iter()
        .filter(|r| matches(&r.supplier, &args.supplier))
        .filter(|r| matches(&r.fragrance, &args.fragrance))
        .collect()
}

fn record_table(records: &[InspectionRecord]) -> TableData {
    let mut headers = vec![
        "Timestamp".to_string(),
        "Operator".to_string(),
        "Supplier".to_string(),
        "Fragrance".to_string(),
        "Level".to_string(),
    ];
    for presentation in Presentation::all() {
        headers.push(format!("{} qty/code/n", presentation.column_suffix()));
    }
    headers.push("Quality".to_string());
    headers.push("Notes".to_string());

    let mut table = TableData::new(headers);
    for record in records {
        let mut row = vec![
            record.timestamp.clone(),
            truncate_str(&record.operator, 16),
            truncate_str(&record.supplier, 20),
            truncate_str(&record.fragrance, 20),
            record.inspection_level.to_string(),
        ];
        for presentation in Presentation::all() {
            let fields = record.fields(*presentation);
            row.push(if fields.quantity == 0 {
                "-".to_string()
            } else {
                format!(
                    "{}/{}/{}",
                    fields.quantity,
                    fields.code,
                    opt_to_string(fields.sample)
                )
            });
        }
        row.push(record.meets_quality.to_string());
        row.push(truncate_str(&record.notes, 30));
        table.push_row(row);
    }
    table
}
