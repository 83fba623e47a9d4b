//! Sampling plan calculator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::presentation::Presentation;
use super::tables::{code_letter, CodeLetter, InspectionLevel};
use super::SamplingError;

/// Marker shown in display cells for a presentation with no plan
pub const PLACEHOLDER: &str = "-";

/// A fraction of the sample size, guaranteed to lie in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Fraction(f64);

impl Fraction {
    pub fn new(value: f64) -> Result<Self, SamplingError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SamplingError::FractionOutOfRange(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Fraction {
    type Error = SamplingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Fraction::new(value)
    }
}

impl FromStr for Fraction {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| SamplingError::InvalidFraction(s.to_string()))?;
        Fraction::new(value)
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Fraction::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Acceptance (Ac) and rejection (Re) numbers for one severity.
///
/// Wider than the sample size so `reject = accept + 1` cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceptReject {
    pub accept: u64,
    pub reject: u64,
}

impl fmt::Display for AcceptReject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.accept, self.reject)
    }
}

/// AQL policy applied to every presentation in a request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeverityThresholds {
    critical: AcceptReject,
    major_accept: Fraction,
    major_reject: Fraction,
    minor_accept: Fraction,
    minor_reject: Fraction,
}

impl SeverityThresholds {
    pub const DEFAULT_CRITICAL_ACCEPT: u32 = 0;
    pub const DEFAULT_CRITICAL_REJECT: u32 = 1;
    pub const DEFAULT_MAJOR_ACCEPT: f64 = 0.03;
    pub const DEFAULT_MAJOR_REJECT: f64 = 0.05;
    pub const DEFAULT_MINOR_ACCEPT: f64 = 0.06;
    pub const DEFAULT_MINOR_REJECT: f64 = 0.10;

    /// Build a threshold set, rejecting out-of-range fractions and a
    /// critical reject number that does not exceed the accept number.
    pub fn new(
        critical_accept: u32,
        critical_reject: u32,
        major: (f64, f64),
        minor: (f64, f64),
    ) -> Result<Self, SamplingError> {
        if critical_reject <= critical_accept {
            return Err(SamplingError::InvalidCriticalThresholds {
                accept: critical_accept,
                reject: critical_reject,
            });
        }

        Ok(Self {
            critical: AcceptReject {
                accept: u64::from(critical_accept),
                reject: u64::from(critical_reject),
            },
            major_accept: Fraction::new(major.0)?,
            major_reject: Fraction::new(major.1)?,
            minor_accept: Fraction::new(minor.0)?,
            minor_reject: Fraction::new(minor.1)?,
        })
    }

    pub fn critical(&self) -> AcceptReject {
        self.critical
    }

    pub fn major(&self) -> (Fraction, Fraction) {
        (self.major_accept, self.major_reject)
    }

    pub fn minor(&self) -> (Fraction, Fraction) {
        (self.minor_accept, self.minor_reject)
    }
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical: AcceptReject {
                accept: u64::from(Self::DEFAULT_CRITICAL_ACCEPT),
                reject: u64::from(Self::DEFAULT_CRITICAL_REJECT),
            },
            major_accept: Fraction(Self::DEFAULT_MAJOR_ACCEPT),
            major_reject: Fraction(Self::DEFAULT_MAJOR_REJECT),
            minor_accept: Fraction(Self::DEFAULT_MINOR_ACCEPT),
            minor_reject: Fraction(Self::DEFAULT_MINOR_REJECT),
        }
    }
}

/// Sampling plan for one presentation of a received lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplingPlan {
    pub presentation: String,
    pub lot: u64,
    pub level: InspectionLevel,
    pub code: CodeLetter,
    /// Units to draw, never more than `lot`
    pub sample: u32,
    pub critical: AcceptReject,
    pub major: AcceptReject,
    pub minor: AcceptReject,
}

/// Code letter and sample size for a lot, with the sample capped at the lot size
pub fn sample_size(lot: u64, level: InspectionLevel) -> (CodeLetter, u32) {
    let code = code_letter(lot, level);
    let base = code.sample_size();
    let sample = u64::from(base).min(lot) as u32;
    (code, sample)
}

/// Derive Ac/Re numbers as percentages of the sample.
///
/// Ac = floor(accept * n), Re = ceil(reject * n). When Re would not exceed
/// Ac it is forced to Ac + 1.
pub fn accept_reject(sample: u32, accept: Fraction, reject: Fraction) -> AcceptReject {
    let n = f64::from(sample);
    let ac = (accept.value() * n).floor() as u64;
    let mut re = (reject.value() * n).ceil() as u64;
    if re <= ac {
        re = ac + 1;
    }
    AcceptReject {
        accept: ac,
        reject: re,
    }
}

/// Build the plan for one presentation, or `None` when nothing was received
pub fn build_plan(
    presentation: &str,
    lot: u64,
    level: InspectionLevel,
    thresholds: &SeverityThresholds,
) -> Option<SamplingPlan> {
    if lot == 0 {
        return None;
    }

    let (code, sample) = sample_size(lot, level);
    let (major_ac, major_re) = thresholds.major();
    let (minor_ac, minor_re) = thresholds.minor();

    Some(SamplingPlan {
        presentation: presentation.to_string(),
        lot,
        level,
        code,
        sample,
        critical: thresholds.critical(),
        major: accept_reject(sample, major_ac, major_re),
        minor: accept_reject(sample, minor_ac, minor_re),
    })
}

/// Plans for every presentation, in canonical order
pub fn calculate(
    quantities: [u64; 3],
    level: InspectionLevel,
    thresholds: &SeverityThresholds,
) -> [Option<SamplingPlan>; 3] {
    let presentations = Presentation::all();
    std::array::from_fn(|i| {
        build_plan(presentations[i].label(), quantities[i], level, thresholds)
    })
}

/// A display row for the plan table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRow {
    pub presentation: String,
    pub lot: u64,
    pub code: String,
    pub sample: String,
    pub critical: String,
    pub major: String,
    pub minor: String,
}

impl PlanRow {
    fn placeholder(presentation: &str) -> Self {
        Self {
            presentation: presentation.to_string(),
            lot: 0,
            code: PLACEHOLDER.to_string(),
            sample: PLACEHOLDER.to_string(),
            critical: PLACEHOLDER.to_string(),
            major: PLACEHOLDER.to_string(),
            minor: PLACEHOLDER.to_string(),
        }
    }
}

impl From<&SamplingPlan> for PlanRow {
    fn from(plan: &SamplingPlan) -> Self {
        Self {
            presentation: plan.presentation.clone(),
            lot: plan.lot,
            code: plan.code.to_string(),
            sample: plan.sample.to_string(),
            critical: plan.critical.to_string(),
            major: plan.major.to_string(),
            minor: plan.minor.to_string(),
        }
    }
}

/// Project the per-presentation plans into display rows
pub fn plan_rows(plans: &[Option<SamplingPlan>; 3]) -> Vec<PlanRow> {
    Presentation::all()
        .iter()
        .zip(plans.iter())
        .map(|(presentation, plan)| match plan {
            Some(plan) => PlanRow::from(plan),
            None => PlanRow::placeholder(presentation.label()),
        })
        .collect()
}
