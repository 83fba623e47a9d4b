//! `rit record` command - Calculate the plan and save an inspection record

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::plan::{print_plans, PlanInputArgs};
use crate::cli::helpers::discover_project;
use crate::cli::GlobalOpts;
use crate::core::sampling::{calculate, InspectionLevel};
use crate::core::{Config, Register};
use crate::entities::inspection::{
    InspectionRecord, Presentation, QualityVerdict, ReceivingForm,
};

#[derive(clap::Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub input: PlanInputArgs,

    /// Operator name (default: config operator)
    #[arg(long, short = 'o')]
    pub operator: Option<String>,

    /// Supplier name
    #[arg(long, short = 's')]
    pub supplier: Option<String>,

    /// Fragrance received
    #[arg(long)]
    pub fragrance: Option<String>,

    /// Supplier lot number
    #[arg(long)]
    pub supplier_lot: Option<String>,

    /// Drum weight in pounds (0 if not applicable)
    #[arg(long)]
    pub drum_weight: Option<f64>,

    /// Did the material meet the expected quality (yes/no)
    #[arg(long, default_value = "yes")]
    pub quality: QualityVerdict,

    /// Observations
    #[arg(long, short = 'n')]
    pub notes: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Register file (default: config register, then inspections/register.csv)
    #[arg(long)]
    pub register: Option<PathBuf>,
}

pub fn run(args: RecordArgs, global: &GlobalOpts) -> Result<()> {
    let project = discover_project(global);
    let config = Config::load_for(project.as_ref().ok())?;
    let register_path = match args.register {
        Some(ref path) => path.clone(),
        None => config.register_path(&project?),
    };

    let mut form = form_from_args(&args, &config);
    if args.interactive {
        prompt_form(&mut form)?;
    }

    form.validate_quantities()?;
    let thresholds = config.thresholds(args.input.aql_overrides())?;
    let plans = calculate(form.quantities, form.level, &thresholds);

    let format = global.format.resolve(config.default_format.as_deref());
    print_plans(&plans, format, global.quiet)?;

    form.validate_for_submission()?;

    let record = InspectionRecord::from_form(&form, &plans, Local::now());
    let register = Register::open(&register_path);
    register.append(&record).into_diagnostic()?;

    tracing::info!(
        supplier = %record.supplier,
        fragrance = %record.fragrance,
        path = %register.path().display(),
        "saved inspection record"
    );

    if !global.quiet {
        eprintln!(
            "{} Saved inspection record (1 row) to {}",
            style("✓").green(),
            style(register.path().display()).cyan()
        );
    }

    Ok(())
}

fn form_from_args(args: &RecordArgs, config: &Config) -> ReceivingForm {
    ReceivingForm {
        operator: args
            .operator
            .clone()
            .or_else(|| config.operator.clone())
            .unwrap_or_default(),
        supplier: args.supplier.clone().unwrap_or_default(),
        fragrance: args.fragrance.clone().unwrap_or_default(),
        supplier_lot: args.supplier_lot.clone().unwrap_or_default(),
        drum_weight_lb: args.drum_weight.unwrap_or(0.0),
        level: args.input.level.unwrap_or_else(|| config.level()),
        quantities: args.input.quantities(),
        quality: args.quality,
        notes: args.notes.clone().unwrap_or_default(),
    }
}

/// Prompt for every field, offering the current values as defaults
fn prompt_form(form: &mut ReceivingForm) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!();
    println!("{} Receiving inspection", style("◆").cyan());
    println!("{}", style("─".repeat(50)).dim());

    form.operator = prompt_text(&theme, "Operator", &form.operator)?;
    form.supplier = prompt_text(&theme, "Supplier", &form.supplier)?;
    form.fragrance = prompt_text(&theme, "Fragrance", &form.fragrance)?;
    form.supplier_lot = prompt_text(&theme, "Supplier lot number", &form.supplier_lot)?;
    form.drum_weight_lb = Input::with_theme(&theme)
        .with_prompt("Drum weight in lb (0 if not applicable)")
        .default(form.drum_weight_lb)
        .interact_text()
        .into_diagnostic()?;

    let levels = InspectionLevel::all();
    let current = levels.iter().position(|l| *l == form.level).unwrap_or(1);
    let selected = Select::with_theme(&theme)
        .with_prompt("Inspection level")
        .items(&levels.iter().map(|l| l.as_str()).collect::<Vec<_>>())
        .default(current)
        .interact()
        .into_diagnostic()?;
    form.level = levels[selected];

    for (i, presentation) in Presentation::all().iter().enumerate() {
        form.quantities[i] = Input::with_theme(&theme)
            .with_prompt(format!("Units received, {}", presentation))
            .default(form.quantity(*presentation))
            .interact_text()
            .into_diagnostic()?;
    }

    let verdicts = [QualityVerdict::Yes, QualityVerdict::No];
    let selected = Select::with_theme(&theme)
        .with_prompt("Did the fragrance meet the expected quality?")
        .items(&["yes", "no"])
        .default(if form.quality == QualityVerdict::Yes { 0 } else { 1 })
        .interact()
        .into_diagnostic()?;
    form.quality = verdicts[selected];

    form.notes = prompt_text(&theme, "Observations", &form.notes)?;
    println!();

    Ok(())
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str, current: &str) -> Result<String> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .default(current.to_string())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AqlConfig;

    fn args() -> RecordArgs {
        RecordArgs {
            input: PlanInputArgs {
                medium: 10,
                ..Default::default()
            },
            operator: None,
            supplier: Some("Superpack".into()),
            fragrance: Some("Rose".into()),
            supplier_lot: None,
            drum_weight: Some(12.5),
            quality: QualityVerdict::No,
            notes: None,
            interactive: false,
            register: None,
        }
    }

    #[test]
    fn test_form_uses_config_operator_and_level() {
        let config = Config {
            operator: Some("Ana".into()),
            default_level: Some(InspectionLevel::III),
            aql: Some(AqlConfig::default()),
            ..Default::default()
        };
        let form = form_from_args(&args(), &config);
        assert_eq!(form.operator, "Ana");
        assert_eq!(form.level, InspectionLevel::III);
        assert_eq!(form.quantities, [0, 10, 0]);
        assert_eq!(form.drum_weight_lb, 12.5);
        assert_eq!(form.quality, QualityVerdict::No);
    }

    #[test]
    fn test_flag_operator_wins_over_config() {
        let mut args = args();
        args.operator = Some("Luis".into());
        let config = Config {
            operator: Some("Ana".into()),
            ..Default::default()
        };
        assert_eq!(form_from_args(&args, &config).operator, "Luis");
    }
}
