//! Receiving inspection entities - the receiving form and the flattened
//! register row

use chrono::{DateTime, Local};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::core::sampling::Presentation;
use crate::core::sampling::{InspectionLevel, SamplingPlan};

/// Timestamp format written to the register
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Did the received material meet the expected quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityVerdict {
    #[default]
    Yes,
    No,
}

impl std::fmt::Display for QualityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityVerdict::Yes => write!(f, "yes"),
            QualityVerdict::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for QualityVerdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "si" | "true" => Ok(QualityVerdict::Yes),
            "no" | "n" | "false" => Ok(QualityVerdict::No),
            _ => Err(format!("Invalid quality verdict: {}. Use yes or no", s)),
        }
    }
}

/// Errors raised while validating a receiving submission
#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum WorkflowError {
    #[error("at least one presentation quantity must be greater than 0")]
    #[diagnostic(
        code(rit::workflow::no_quantities),
        help("pass --large, --medium or --small with a positive quantity")
    )]
    NoQuantities,

    #[error("{0} is required before saving a record")]
    #[diagnostic(code(rit::workflow::missing_field))]
    MissingField(&'static str),

    #[error("drum weight must be a finite number of pounds, 0 or more (got {0})")]
    #[diagnostic(code(rit::workflow::drum_weight), help("use 0 when not applicable"))]
    InvalidDrumWeight(f64),
}

/// Everything collected for one receiving submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivingForm {
    pub operator: String,
    pub supplier: String,
    pub fragrance: String,
    #[serde(default)]
    pub supplier_lot: String,
    /// Drum weight in pounds, 0 when not applicable
    #[serde(default)]
    pub drum_weight_lb: f64,
    #[serde(default)]
    pub level: InspectionLevel,
    /// Quantities for the large, medium and small presentations
    pub quantities: [u64; 3],
    #[serde(default)]
    pub quality: QualityVerdict,
    #[serde(default)]
    pub notes: String,
}

impl ReceivingForm {
    /// Quantity received for a presentation
    pub fn quantity(&self, presentation: Presentation) -> u64 {
        match presentation {
            Presentation::Large => self.quantities[0],
            Presentation::Medium => self.quantities[1],
            Presentation::Small => self.quantities[2],
        }
    }

    /// A plan can only be computed when something was received
    pub fn validate_quantities(&self) -> Result<(), WorkflowError> {
        if self.quantities.iter().all(|q| *q == 0) {
            return Err(WorkflowError::NoQuantities);
        }
        Ok(())
    }

    /// Quantities plus the fields a saved record cannot be without
    pub fn validate_for_submission(&self) -> Result<(), WorkflowError> {
        self.validate_quantities()?;
        if self.operator.trim().is_empty() {
            return Err(WorkflowError::MissingField("operator"));
        }
        if self.supplier.trim().is_empty() {
            return Err(WorkflowError::MissingField("supplier"));
        }
        if self.fragrance.trim().is_empty() {
            return Err(WorkflowError::MissingField("fragrance"));
        }
        if !self.drum_weight_lb.is_finite() || self.drum_weight_lb < 0.0 {
            return Err(WorkflowError::InvalidDrumWeight(self.drum_weight_lb));
        }
        Ok(())
    }
}

/// Plan-derived columns for one presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationFields {
    pub quantity: u64,
    pub code: String,
    pub sample: Option<u32>,
}

impl PresentationFields {
    /// Absent plans flatten to a zero quantity with blank code and sample
    pub fn from_plan(plan: Option<&SamplingPlan>) -> Self {
        match plan {
            Some(plan) => Self {
                quantity: plan.lot,
                code: plan.code.to_string(),
                sample: Some(plan.sample),
            },
            None => Self {
                quantity: 0,
                code: String::new(),
                sample: None,
            },
        }
    }
}

/// One row of the inspection register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub timestamp: String,
    pub operator: String,
    pub supplier: String,
    pub fragrance: String,
    pub supplier_lot: String,
    pub drum_weight_lb: Option<f64>,
    pub inspection_level: InspectionLevel,

    pub qty_500g: u64,
    pub code_500g: String,
    pub n_500g: Option<u32>,

    pub qty_220g: u64,
    pub code_220g: String,
    pub n_220g: Option<u32>,

    pub qty_30g: u64,
    pub code_30g: String,
    pub n_30g: Option<u32>,

    pub meets_quality: QualityVerdict,
    pub notes: String,
}

impl InspectionRecord {
    /// Register column names, in order
    pub const HEADERS: [&'static str; 18] = [
        "timestamp",
        "operator",
        "supplier",
        "fragrance",
        "supplier_lot",
        "drum_weight_lb",
        "inspection_level",
        "qty_500g",
        "code_500g",
        "n_500g",
        "qty_220g",
        "code_220g",
        "n_220g",
        "qty_30g",
        "code_30g",
        "n_30g",
        "meets_quality",
        "notes",
    ];

    /// Flatten a submission and its plans into a register row
    pub fn from_form(
        form: &ReceivingForm,
        plans: &[Option<SamplingPlan>; 3],
        timestamp: DateTime<Local>,
    ) -> Self {
        let [large, medium, small] =
            [0, 1, 2].map(|i| PresentationFields::from_plan(plans[i].as_ref()));

        Self {
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            operator: form.operator.trim().to_string(),
            supplier: form.supplier.trim().to_string(),
            fragrance: form.fragrance.trim().to_string(),
            supplier_lot: form.supplier_lot.trim().to_string(),
            drum_weight_lb: (form.drum_weight_lb != 0.0).then_some(form.drum_weight_lb),
            inspection_level: form.level,
            qty_500g: large.quantity,
            code_500g: large.code,
            n_500g: large.sample,
            qty_220g: medium.quantity,
            code_220g: medium.code,
            n_220g: medium.sample,
            qty_30g: small.quantity,
            code_30g: small.code,
            n_30g: small.sample,
            meets_quality: form.quality,
            notes: form.notes.trim().to_string(),
        }
    }

    /// Plan-derived columns for a presentation
    pub fn fields(&self, presentation: Presentation) -> PresentationFields {
        let (quantity, code, sample) = match presentation {
            Presentation::Large => (self.qty_500g, &self.code_500g, self.n_500g),
            Presentation::Medium => (self.qty_220g, &self.code_220g, self.n_220g),
            Presentation::Small => (self.qty_30g, &self.code_30g, self.n_30g),
        };
        PresentationFields {
            quantity,
            code: code.clone(),
            sample,
        }
    }
}
