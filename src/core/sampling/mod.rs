//! MIL-STD-105E single sampling plans
//!
//! The lookup tables map a lot size and inspection level to a code letter and
//! a base sample size. The plan calculator turns those into accept/reject
//! thresholds for each defect severity.

pub mod plan;
pub mod presentation;
pub mod tables;

use miette::Diagnostic;
use thiserror::Error;

pub use plan::{
    accept_reject, build_plan, calculate, plan_rows, sample_size, AcceptReject, Fraction,
    PlanRow, SamplingPlan, SeverityThresholds, PLACEHOLDER,
};
pub use presentation::Presentation;
pub use tables::{
    base_sample_size, code_letter, validate_tables, CodeLetter, InspectionLevel, LotBracket,
    FALLBACK_CODE_LETTER, LOT_BRACKETS,
};

/// Errors raised by the sampling tables and threshold configuration
#[derive(Debug, Error, Diagnostic)]
pub enum SamplingError {
    #[error("unknown code letter '{0}' (expected one of A-H, J-N, P-R)")]
    #[diagnostic(code(rit::sampling::unknown_code_letter))]
    UnknownCodeLetter(String),

    #[error("malformed sampling table: {0}")]
    #[diagnostic(code(rit::sampling::malformed_table))]
    MalformedTable(String),

    #[error("fraction {0} is outside [0, 1]")]
    #[diagnostic(
        code(rit::sampling::fraction_out_of_range),
        help("AQL percentages are fractions of the sample, e.g. 0.05 for 5%")
    )]
    FractionOutOfRange(f64),

    #[error("'{0}' is not a number")]
    #[diagnostic(
        code(rit::sampling::invalid_fraction),
        help("AQL percentages are fractions of the sample, e.g. 0.05 for 5%")
    )]
    InvalidFraction(String),

    #[error("critical reject ({reject}) must be greater than critical accept ({accept})")]
    #[diagnostic(code(rit::sampling::critical_thresholds))]
    InvalidCriticalThresholds { accept: u32, reject: u32 },

    #[error("invalid inspection level '{0}' (use I, II or III)")]
    #[diagnostic(code(rit::sampling::inspection_level))]
    InvalidLevel(String),
}
