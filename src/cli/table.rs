//! Table formatting for CLI output
//!
//! Commands build a [`TableData`] of display strings and hand it, together
//! with the typed values, to [`render`]. Structured formats (JSON, YAML)
//! serialize the typed values; tabular formats use the display strings.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::tsv_cell;
use crate::cli::OutputFormat;

/// Headers plus string cells, ready for tabular output
#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn to_tabled(&self, style: TableStyle) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }
        let mut table = builder.build();
        match style {
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
        table.to_string()
    }

    fn to_tsv(&self) -> String {
        let mut out = String::new();
        for line in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let cells: Vec<String> = line.iter().map(|c| tsv_cell(c)).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            writer.write_record(row).into_diagnostic()?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("{}", e.error()))?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

#[derive(Clone, Copy)]
enum TableStyle {
    Rounded,
    Markdown,
}

/// Render values in the requested format. `Auto` must be resolved first.
pub fn render<T: Serialize>(values: &T, table: &TableData, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Auto | OutputFormat::Table => {
            let mut s = table.to_tabled(TableStyle::Rounded);
            s.push('\n');
            s
        }
        OutputFormat::Md => {
            let mut s = table.to_tabled(TableStyle::Markdown);
            s.push('\n');
            s
        }
        OutputFormat::Tsv => table.to_tsv(),
        OutputFormat::Csv => table.to_csv()?,
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(values).into_diagnostic()?;
            s.push('\n');
            s
        }
        OutputFormat::Yaml => serde_yml::to_string(values).into_diagnostic()?,
    };
    Ok(out)
}
