//! `rit plan` command - Calculate the sampling plan for a shipment

use console::style;
use miette::Result;

use crate::cli::helpers::discover_project;
use crate::cli::table::{render, TableData};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sampling::{
    calculate, plan_rows, Fraction, InspectionLevel, PlanRow, SamplingPlan,
};
use crate::core::{AqlConfig, Config};
use crate::entities::inspection::ReceivingForm;

/// Quantities, level and AQL overrides shared by `plan` and `record`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PlanInputArgs {
    /// Units received in the 500 g presentation
    #[arg(long, default_value_t = 0)]
    pub large: u64,

    /// Units received in the 220 g presentation
    #[arg(long, default_value_t = 0)]
    pub medium: u64,

    /// Units received in the 30 g presentation
    #[arg(long, default_value_t = 0)]
    pub small: u64,

    /// Inspection level: I, II or III (default: config, then II)
    #[arg(long, short = 'l')]
    pub level: Option<InspectionLevel>,

    /// Critical defects: acceptance number
    #[arg(long)]
    pub critical_accept: Option<u32>,

    /// Critical defects: rejection number
    #[arg(long)]
    pub critical_reject: Option<u32>,

    /// Major defects: accept fraction of the sample (0-1)
    #[arg(long)]
    pub major_accept: Option<Fraction>,

    /// Major defects: reject fraction of the sample (0-1)
    #[arg(long)]
    pub major_reject: Option<Fraction>,

    /// Minor defects: accept fraction of the sample (0-1)
    #[arg(long)]
    pub minor_accept: Option<Fraction>,

    /// Minor defects: reject fraction of the sample (0-1)
    #[arg(long)]
    pub minor_reject: Option<Fraction>,
}

impl PlanInputArgs {
    pub fn quantities(&self) -> [u64; 3] {
        [self.large, self.medium, self.small]
    }

    /// AQL flags given on the command line
    pub fn aql_overrides(&self) -> AqlConfig {
        AqlConfig {
            critical_accept: self.critical_accept,
            critical_reject: self.critical_reject,
            major_accept: self.major_accept,
            major_reject: self.major_reject,
            minor_accept: self.minor_accept,
            minor_reject: self.minor_reject,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: PlanInputArgs,
}

pub fn run(args: PlanArgs, global: &GlobalOpts) -> Result<()> {
    let project = discover_project(global).ok();
    let config = Config::load_for(project.as_ref())?;

    let form = ReceivingForm {
        level: args.input.level.unwrap_or_else(|| config.level()),
        quantities: args.input.quantities(),
        ..Default::default()
    };
    form.validate_quantities()?;

    let thresholds = config.thresholds(args.input.aql_overrides())?;
    tracing::debug!(?thresholds, level = %form.level, "calculating sampling plan");

    let plans = calculate(form.quantities, form.level, &thresholds);
    let format = global.format.resolve(config.default_format.as_deref());
    print_plans(&plans, format, global.quiet)
}

/// Print the plan table for a set of presentations
pub fn print_plans(
    plans: &[Option<SamplingPlan>; 3],
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let rows = plan_rows(plans);
    let out = render(&rows, &plan_table(&rows), format)?;

    let human = matches!(format, OutputFormat::Table | OutputFormat::Md);
    if human && !quiet {
        let level = plans.iter().flatten().map(|p| p.level).next();
        if let Some(level) = level {
            println!(
                "{} Sampling plan, inspection level {}",
                style("◆").cyan(),
                style(level).bold()
            );
        }
    }

    print!("{}", out);

    if human && !quiet {
        println!(
            "{}",
            style("Critical/Major/Minor are shown as Ac/Re (accept on Ac or fewer defects, reject on Re or more).").dim()
        );
    }
    Ok(())
}

fn plan_table(rows: &[PlanRow]) -> TableData {
    let mut table = TableData::new([
        "Presentation",
        "Lot",
        "Code",
        "Sample",
        "Critical Ac/Re",
        "Major Ac/Re",
        "Minor Ac/Re",
    ]);
    for row in rows {
        table.push_row([
            row.presentation.clone(),
            row.lot.to_string(),
            row.code.clone(),
            row.sample.clone(),
            row.critical.clone(),
            row.major.clone(),
            row.minor.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampling::SeverityThresholds;

    #[test]
    fn test_plan_table_has_row_per_presentation() {
        let plans = calculate([0, 10, 5], InspectionLevel::II, &SeverityThresholds::default());
        let table = plan_table(&plan_rows(&plans));
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], ["500 g", "0", "-", "-", "-", "-", "-"]);
        assert_eq!(table.rows[1], ["220 g", "10", "B", "3", "0/1", "0/1", "0/1"]);
        assert_eq!(table.rows[2], ["30 g", "5", "A", "2", "0/1", "0/1", "0/1"]);
    }

    #[test]
    fn test_aql_overrides_from_flags() {
        let args = PlanInputArgs {
            major_reject: Some(Fraction::new(0.2).unwrap()),
            critical_reject: Some(2),
            ..Default::default()
        };
        let aql = args.aql_overrides();
        assert_eq!(aql.major_reject.map(|f| f.value()), Some(0.2));
        assert_eq!(aql.critical_reject, Some(2));
        assert_eq!(aql.minor_accept, None);
    }
}
