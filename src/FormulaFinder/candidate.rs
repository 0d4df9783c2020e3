//! Candidate elements: the units (element, group or bare mass) the finder combines into formulas.
use crate::Chemistry::tables::ElementLookup;
use crate::FormulaFinder::errors::FinderError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write as _;

/// upper limit of the counts of the bounded search
pub const MAXIMUM_BOUNDED_COUNT: u32 = 65565;

/// One formula token. Bare masses keep their index and are only turned into a label (`C1_`, `C2_`...)
/// when a formula is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormulaToken {
    /// element symbol or group abbreviation
    Standard(String),
    /// 1-based number of a custom mass
    CustomMass(usize),
}

impl FormulaToken {
    pub fn label(&self) -> String {
        match self {
            FormulaToken::Standard(symbol) => symbol.clone(),
            FormulaToken::CustomMass(n) => format!("C{}_", n),
        }
    }

    /// calls `f` with the label bytes, custom labels are formatted on the stack
    fn with_label<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match self {
            FormulaToken::Standard(symbol) => f(symbol.as_bytes()),
            FormulaToken::CustomMass(n) => {
                let mut buf = [0u8; 24];
                let remaining = {
                    let mut cursor = &mut buf[..];
                    let _ = write!(cursor, "C{}_", n);
                    cursor.len()
                };
                f(&buf[..buf.len() - remaining])
            }
        }
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self, FormulaToken::Standard(s) if s == symbol)
    }

    /// carbon first, hydrogen second, everything else after them
    pub fn rank(&self) -> u8 {
        match self {
            FormulaToken::Standard(s) if s == "C" => 0,
            FormulaToken::Standard(s) if s == "H" => 1,
            _ => 2,
        }
    }
}

impl Ord for FormulaToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (FormulaToken::Standard(a), FormulaToken::Standard(b)) => a.cmp(b),
            _ => self.with_label(|a| other.with_label(|b| a.cmp(b))),
        })
    }
}

impl PartialOrd for FormulaToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FormulaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaToken::Standard(symbol) => f.write_str(symbol),
            FormulaToken::CustomMass(n) => write!(f, "C{}_", n),
        }
    }
}

/// Per candidate search limits: target percent composition (percent search) and
/// count range (bounded search)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateTolerance {
    pub target_percent: f64,
    pub min_count: u32,
    pub max_count: u32,
}

impl Default for CandidateTolerance {
    fn default() -> Self {
        Self {
            target_percent: 0.0,
            min_count: 0,
            max_count: 10,
        }
    }
}

impl CandidateTolerance {
    pub fn new(target_percent: f64, min_count: u32, max_count: u32) -> Self {
        Self {
            target_percent,
            min_count,
            max_count,
        }
    }

    pub fn with_percent(target_percent: f64) -> Self {
        Self {
            target_percent,
            ..Self::default()
        }
    }

    pub fn with_counts(min_count: u32, max_count: u32) -> Self {
        Self {
            min_count,
            max_count,
            ..Self::default()
        }
    }

    /// counts into [0, 65565] with min <= max, percent into [0, 100]
    pub fn clamped(&self) -> Self {
        let min_count = self.min_count.min(MAXIMUM_BOUNDED_COUNT);
        let max_count = self.max_count.clamp(min_count, MAXIMUM_BOUNDED_COUNT);
        let target_percent = if self.target_percent.is_finite() {
            self.target_percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            target_percent,
            min_count,
            max_count,
        }
    }
}

/// A searchable unit with everything the search needs resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateElement {
    pub token: FormulaToken,
    pub mass: f64,
    pub charge: f64,
    pub count_minimum: u32,
    pub count_maximum: u32,
    pub percent_comp_minimum: f64,
    pub percent_comp_maximum: f64,
}

impl CandidateElement {
    pub fn symbol(&self) -> String {
        self.token.label()
    }
}

/// Resolves user keys into candidates sorted by descending mass.
/// A key is an element symbol, a plain number (custom mass) or a group abbreviation, in that order.
/// The first unresolvable key fails the whole resolution.
pub fn resolve_candidates(
    candidates: &BTreeMap<String, CandidateTolerance>,
    lookup: &dyn ElementLookup,
    percent_tolerance: f64,
) -> Result<Vec<CandidateElement>, FinderError> {
    let mut resolved = Vec::with_capacity(candidates.len());
    let mut custom_counter = 0;
    for (key, tolerance) in candidates {
        let invalid = || FinderError::InvalidCandidateElement { key: key.clone() };
        let (token, mass, charge) = if lookup.is_valid_element_symbol(key) {
            let (mass, charge) = lookup.element_info(key).ok_or_else(invalid)?;
            (FormulaToken::Standard(key.clone()), mass, charge)
        } else if let Ok(mass) = key.trim().parse::<f64>() {
            custom_counter += 1;
            (FormulaToken::CustomMass(custom_counter), mass, 0.0)
        } else if let Some((mass, charge)) = lookup.abbreviation_info(key) {
            (FormulaToken::Standard(key.clone()), mass, charge)
        } else {
            return Err(invalid());
        };
        if !(mass.is_finite() && mass > 0.0) {
            return Err(invalid());
        }
        resolved.push(CandidateElement {
            token,
            mass,
            charge,
            count_minimum: tolerance.min_count,
            count_maximum: tolerance.max_count.max(tolerance.min_count),
            percent_comp_minimum: tolerance.target_percent - percent_tolerance,
            percent_comp_maximum: tolerance.target_percent + percent_tolerance,
        });
    }
    // heaviest first
    resolved.sort_by(|a, b| b.mass.total_cmp(&a.mass));
    Ok(resolved)
}
