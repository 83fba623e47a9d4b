//! MIL-STD-105E Table I (sample size code letters) and Table II-A sample sizes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SamplingError;

/// General inspection level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InspectionLevel {
    I,
    #[default]
    II,
    III,
}

impl InspectionLevel {
    /// All levels in table column order
    pub fn all() -> &'static [InspectionLevel] {
        &[InspectionLevel::I, InspectionLevel::II, InspectionLevel::III]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionLevel::I => "I",
            InspectionLevel::II => "II",
            InspectionLevel::III => "III",
        }
    }

    fn column(self) -> usize {
        match self {
            InspectionLevel::I => 0,
            InspectionLevel::II => 1,
            InspectionLevel::III => 2,
        }
    }
}

impl fmt::Display for InspectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InspectionLevel {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "I" | "1" => Ok(InspectionLevel::I),
            "II" | "2" => Ok(InspectionLevel::II),
            "III" | "3" => Ok(InspectionLevel::III),
            _ => Err(SamplingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Sample size code letter. The standard skips I and O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CodeLetter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
    M,
    N,
    P,
    Q,
    R,
}

impl CodeLetter {
    /// The full alphabet in ascending sample-size order
    pub fn all() -> &'static [CodeLetter] {
        use CodeLetter::*;
        &[A, B, C, D, E, F, G, H, J, K, L, M, N, P, Q, R]
    }

    pub fn as_str(&self) -> &'static str {
        use CodeLetter::*;
        match self {
            A => "A",
            B => "B",
            C => "C",
            D => "D",
            E => "E",
            F => "F",
            G => "G",
            H => "H",
            J => "J",
            K => "K",
            L => "L",
            M => "M",
            N => "N",
            P => "P",
            Q => "Q",
            R => "R",
        }
    }

    /// Base sample size for this code letter (before clamping to the lot)
    pub fn sample_size(&self) -> u32 {
        use CodeLetter::*;
        match self {
            A => 2,
            B => 3,
            C => 5,
            D => 8,
            E => 13,
            F => 20,
            G => 32,
            H => 50,
            J => 80,
            K => 125,
            L => 200,
            M => 315,
            N => 500,
            P => 800,
            Q => 1250,
            R => 2000,
        }
    }
}

impl fmt::Display for CodeLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CodeLetter {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        CodeLetter::all()
            .iter()
            .find(|c| c.as_str() == upper)
            .copied()
            .ok_or_else(|| SamplingError::UnknownCodeLetter(s.to_string()))
    }
}

/// One row of Table I: an inclusive lot-size range and its letter per level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotBracket {
    pub min: u64,
    pub max: u64,
    /// Letters for levels I, II and III
    pub letters: [CodeLetter; 3],
}

impl LotBracket {
    const fn new(min: u64, max: u64, letters: [CodeLetter; 3]) -> Self {
        Self { min, max, letters }
    }

    pub fn contains(&self, lot: u64) -> bool {
        self.min <= lot && lot <= self.max
    }

    pub fn letter(&self, level: InspectionLevel) -> CodeLetter {
        self.letters[level.column()]
    }
}

/// Letter returned when the lot is smaller than the first bracket (0 or 1 units)
pub const FALLBACK_CODE_LETTER: CodeLetter = CodeLetter::N;

const BRACKETS: [LotBracket; 15] = {
    use CodeLetter::*;
    [
        LotBracket::new(2, 8, [A, A, B]),
        LotBracket::new(9, 15, [A, B, C]),
        LotBracket::new(16, 25, [B, C, D]),
        LotBracket::new(26, 50, [C, D, E]),
        LotBracket::new(51, 90, [D, F, G]),
        LotBracket::new(91, 150, [D, F, G]),
        LotBracket::new(151, 280, [E, G, H]),
        LotBracket::new(281, 500, [F, H, J]),
        LotBracket::new(501, 1200, [G, J, K]),
        LotBracket::new(1201, 3200, [H, K, L]),
        LotBracket::new(3201, 10000, [J, L, M]),
        LotBracket::new(10001, 35000, [K, M, N]),
        LotBracket::new(35001, 150000, [L, N, P]),
        LotBracket::new(150001, 500000, [M, P, Q]),
        LotBracket::new(500001, u64::MAX, [N, Q, R]),
    ]
};

/// Table I, ascending. The final upper bound is open-ended.
pub const LOT_BRACKETS: &[LotBracket] = &BRACKETS;

/// Resolve the sample size code letter for a lot.
///
/// First matching bracket wins. Lots below the table minimum resolve to
/// [`FALLBACK_CODE_LETTER`].
pub fn code_letter(lot: u64, level: InspectionLevel) -> CodeLetter {
    match LOT_BRACKETS.iter().find(|b| b.contains(lot)) {
        Some(bracket) => bracket.letter(level),
        None => {
            tracing::debug!(
                lot,
                fallback = %FALLBACK_CODE_LETTER,
                "lot size below smallest bracket, using fallback code letter"
            );
            FALLBACK_CODE_LETTER
        }
    }
}

/// Base sample size for a textual code letter
pub fn base_sample_size(code: &str) -> Result<u32, SamplingError> {
    code.parse::<CodeLetter>().map(|c| c.sample_size())
}

/// Check the reference tables are well formed.
///
/// Brackets must start at 2, be contiguous and end at the open-ended
/// sentinel. Sample sizes must not decrease along the alphabet.
pub fn validate_tables() -> Result<(), SamplingError> {
    let first = LOT_BRACKETS
        .first()
        .ok_or_else(|| SamplingError::MalformedTable("lot bracket table is empty".into()))?;
    if first.min != 2 {
        return Err(SamplingError::MalformedTable(format!(
            "first bracket starts at {}, expected 2",
            first.min
        )));
    }

    for pair in LOT_BRACKETS.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.min > prev.max {
            return Err(SamplingError::MalformedTable(format!(
                "bracket {}-{} is inverted",
                prev.min, prev.max
            )));
        }
        if prev.max.checked_add(1) != Some(next.min) {
            return Err(SamplingError::MalformedTable(format!(
                "bracket {}-{} is not followed by {}",
                prev.min,
                prev.max,
                prev.max.saturating_add(1)
            )));
        }
    }

    if LOT_BRACKETS.last().map(|b| b.max) != Some(u64::MAX) {
        return Err(SamplingError::MalformedTable(
            "last bracket must be open-ended".into(),
        ));
    }

    for pair in CodeLetter::all().windows(2) {
        if pair[1].sample_size() < pair[0].sample_size() {
            return Err(SamplingError::MalformedTable(format!(
                "sample size for {} is smaller than for {}",
                pair[1], pair[0]
            )));
        }
    }

    Ok(())
}
