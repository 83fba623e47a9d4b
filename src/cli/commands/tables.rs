//! `rit tables` command - Print the sampling reference tables

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::discover_project;
use crate::cli::table::{render, TableData};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sampling::{CodeLetter, InspectionLevel, LOT_BRACKETS};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct TablesArgs {
    /// Print only one of the tables
    #[arg(long, value_enum)]
    pub only: Option<ReferenceTable>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceTable {
    /// Lot size ranges to code letters
    Letters,
    /// Code letters to sample sizes
    Sizes,
}

#[derive(Debug, Serialize)]
struct BracketRow {
    min: u64,
    /// None for the open-ended last bracket
    max: Option<u64>,
    level_i: CodeLetter,
    level_ii: CodeLetter,
    level_iii: CodeLetter,
}

#[derive(Debug, Serialize)]
struct SampleSizeRow {
    code: CodeLetter,
    sample_size: u32,
}

#[derive(Debug, Serialize)]
struct ReferenceTables {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    code_letters: Vec<BracketRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sample_sizes: Vec<SampleSizeRow>,
}

pub fn run(args: TablesArgs, global: &GlobalOpts) -> Result<()> {
    let project = discover_project(global).ok();
    let config = Config::load_for(project.as_ref())?;
    let format = global.format.resolve(config.default_format.as_deref());

    let show_letters = args.only != Some(ReferenceTable::Sizes);
    let show_sizes = args.only != Some(ReferenceTable::Letters);

    let tables = ReferenceTables {
        code_letters: if show_letters { bracket_rows() } else { Vec::new() },
        sample_sizes: if show_sizes { sample_size_rows() } else { Vec::new() },
    };

    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        print!("{}", render(&tables, &TableData::default(), format)?);
        return Ok(());
    }

    let human = matches!(format, OutputFormat::Table | OutputFormat::Md);
    if show_letters {
        if human && !global.quiet {
            println!("{}", style("Sample size code letters").bold());
        }
        print!(
            "{}",
            render(&tables.code_letters, &bracket_table(&tables.code_letters), format)?
        );
    }
    if show_letters && show_sizes {
        println!();
    }
    if show_sizes {
        if human && !global.quiet {
            println!("{}", style("Sample sizes").bold());
        }
        print!(
            "{}",
            render(&tables.sample_sizes, &sample_size_table(&tables.sample_sizes), format)?
        );
    }
    Ok(())
}

fn bracket_rows() -> Vec<BracketRow> {
    LOT_BRACKETS
        .iter()
        .map(|b| BracketRow {
            min: b.min,
            max: (b.max != u64::MAX).then_some(b.max),
            level_i: b.letter(InspectionLevel::I),
            level_ii: b.letter(InspectionLevel::II),
            level_iii: b.letter(InspectionLevel::III),
        })
        .collect()
}

fn sample_size_rows() -> Vec<SampleSizeRow> {
    CodeLetter::all()
        .iter()
        .map(|c| SampleSizeRow {
            code: *c,
            sample_size: c.sample_size(),
        })
        .collect()
}

fn bracket_table(rows: &[BracketRow]) -> TableData {
    let mut table = TableData::new(["Lot size", "I", "II", "III"]);
    for row in rows {
        let range = match row.max {
            Some(max) => format!("{} to {}", row.min, max),
            None => format!("{} and over", row.min),
        };
        table.push_row([
            range,
            row.level_i.to_string(),
            row.level_ii.to_string(),
            row.level_iii.to_string(),
        ]);
    }
    table
}

fn sample_size_table(rows: &[SampleSizeRow]) -> TableData {
    let mut table = TableData::new(["Code", "Sample size"]);
    for row in rows {
        table.push_row([row.code.to_string(), row.sample_size.to_string()]);
    }
    table
}
