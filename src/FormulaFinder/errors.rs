use crate::Chemistry::molmass::FormulaParseError;
use thiserror::Error;

/// error types of the formula finder
#[derive(Debug, Error)]
pub enum FinderError {
    /// key is neither an element, a number nor a known group
    #[error("Invalid candidate element: '{key}' is not an element symbol, abbreviation or positive mass")]
    InvalidCandidateElement { key: String },
    #[error("Invalid search configuration: {0}")]
    InvalidSearchConfiguration(String),
    /// a composition failed the hydrogen, charge or m/z checks
    #[error("Infeasible compound: {0}")]
    InfeasibleCompound(String),
    /// operation count estimate exceeds u64
    #[error("Numeric overflow while estimating the number of operations")]
    NumericOverflow,
    #[error("Search aborted")]
    Aborted,
    #[error("Unexpected error verifying {formula}: {reason}")]
    Verification { formula: String, reason: String },
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaParseError),
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings format error: {0}")]
    Json(#[from] serde_json::Error),
}
