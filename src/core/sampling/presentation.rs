//! Package presentations, in the canonical order used by plans and the register

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package presentation received from the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// 500 g package
    Large,
    /// 220 g package
    Medium,
    /// 30 g package
    Small,
}

impl Presentation {
    /// All presentations in canonical display order
    pub fn all() -> &'static [Presentation; 3] {
        &[Presentation::Large, Presentation::Medium, Presentation::Small]
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Presentation::Large => "500 g",
            Presentation::Medium => "220 g",
            Presentation::Small => "30 g",
        }
    }

    /// Suffix used in register column names
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Presentation::Large => "500g",
            Presentation::Medium => "220g",
            Presentation::Small => "30g",
        }
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
