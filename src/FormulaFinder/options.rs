//! Search options of the formula finder.
//!
//! The charge related switches depend on each other:
//! finding a target m/z requires a limited charge range, and a limited charge range requires
//! charge computation. The setters keep this chain consistent, so the fields are private.
use serde::{Deserialize, Serialize};

/// search algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SearchMode {
    /// recursive enumeration pruned by mass, count bounds are ignored
    #[default]
    Thorough,
    /// enumeration of explicit min..max count ranges of every candidate
    Bounded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SearchOptionsFields", into = "SearchOptionsFields")]
pub struct SearchOptions {
    find_charge: bool,
    limit_charge_range: bool,
    charge_min: i32,
    charge_max: i32,
    find_target_mz: bool,
    search_mode: SearchMode,
    verify_hydrogens: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            find_charge: true,
            limit_charge_range: false,
            charge_min: -4,
            charge_max: 4,
            find_target_mz: false,
            search_mode: SearchMode::Thorough,
            verify_hydrogens: true,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_charge(&self) -> bool {
        self.find_charge
    }
    /// disabling charge computation also disables the charge range and the target m/z mode
    pub fn set_find_charge(&mut self, value: bool) {
        self.find_charge = value;
        if !value {
            self.limit_charge_range = false;
            self.find_target_mz = false;
        }
    }

    pub fn limit_charge_range(&self) -> bool {
        self.limit_charge_range
    }
    pub fn set_limit_charge_range(&mut self, value: bool) {
        self.limit_charge_range = value;
        if value {
            self.find_charge = true;
        } else {
            self.find_target_mz = false;
        }
    }

    pub fn charge_min(&self) -> i32 {
        self.charge_min
    }
    pub fn charge_max(&self) -> i32 {
        self.charge_max
    }
    /// sets the allowed charge range, the bounds are swapped if given in reverse order
    pub fn set_charge_range(&mut self, charge_min: i32, charge_max: i32) {
        self.charge_min = charge_min.min(charge_max);
        self.charge_max = charge_min.max(charge_max);
    }

    pub fn find_target_mz(&self) -> bool {
        self.find_target_mz
    }
    /// searching for a target m/z turns on charge computation and the charge range limit
    pub fn set_find_target_mz(&mut self, value: bool) {
        self.find_target_mz = value;
        if value {
            self.find_charge = true;
            self.limit_charge_range = true;
        }
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }
    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    pub fn verify_hydrogens(&self) -> bool {
        self.verify_hydrogens
    }
    pub fn set_verify_hydrogens(&mut self, value: bool) {
        self.verify_hydrogens = value;
    }

    /// charge multiples visited in target m/z mode: 1..=max(|charge_min|, |charge_max|)
    pub fn mz_charge_multiples(&self) -> std::ops::RangeInclusive<i32> {
        let min = self.charge_min.max(1);
        let max = self.charge_min.abs().max(self.charge_max.abs()).max(min);
        min..=max
    }
}

/// plain serialized form; converted back through the setters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchOptionsFields {
    find_charge: bool,
    limit_charge_range: bool,
    charge_min: i32,
    charge_max: i32,
    find_target_mz: bool,
    search_mode: SearchMode,
    verify_hydrogens: bool,
}

impl From<SearchOptionsFields> for SearchOptions {
    fn from(fields: SearchOptionsFields) -> Self {
        let mut options = SearchOptions::default();
        options.set_charge_range(fields.charge_min, fields.charge_max);
        options.set_find_charge(fields.find_charge);
        options.set_limit_charge_range(fields.limit_charge_range);
        options.set_find_target_mz(fields.find_target_mz);
        options.set_search_mode(fields.search_mode);
        options.set_verify_hydrogens(fields.verify_hydrogens);
        options
    }
}

impl From<SearchOptions> for SearchOptionsFields {
    fn from(options: SearchOptions) -> Self {
        Self {
            find_charge: options.find_charge,
            limit_charge_range: options.limit_charge_range,
            charge_min: options.charge_min,
            charge_max: options.charge_max,
            find_target_mz: options.find_target_mz,
            search_mode: options.search_mode,
            verify_hydrogens: options.verify_hydrogens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_mz_enables_charge_chain() {
        let mut options = SearchOptions::new();
        options.set_find_charge(false);
        assert!(!options.find_charge());
        options.set_find_target_mz(true);
        assert!(options.find_charge());
        assert!(options.limit_charge_range());
        assert!(options.find_target_mz());
    }

    #[test]
    fn test_disabling_charge_disables_dependents() {
        let mut options = SearchOptions::new();
        options.set_find_target_mz(true);
        options.set_find_charge(false);
        assert!(!options.limit_charge_range());
        assert!(!options.find_target_mz());

        options.set_find_target_mz(true);
        options.set_limit_charge_range(false);
        assert!(!options.find_target_mz());
        assert!(options.find_charge());
    }

    #[test]
    fn test_charge_multiples() {
        let mut options = SearchOptions::new();
        options.set_charge_range(-3, 2);
        assert_eq!(options.mz_charge_multiples(), 1..=3);
        options.set_charge_range(0, 0);
        assert_eq!(options.mz_charge_multiples(), 1..=1);
        options.set_charge_range(2, 4);
        assert_eq!(options.mz_charge_multiples(), 2..=4);
        options.set_charge_range(5, 1);
        assert_eq!((options.charge_min(), options.charge_max()), (1, 5));
    }

    #[test]
    fn test_deserialization_restores_invariants() {
        let json = r#"{"find_charge":false,"limit_charge_range":false,"charge_min":-2,"charge_max":2,
            "find_target_mz":true,"search_mode":"Bounded","verify_hydrogens":false}"#;
        let options: SearchOptions = serde_json::from_str(json).unwrap();
        assert!(options.find_target_mz());
        assert!(options.limit_charge_range());
        assert!(options.find_charge());
        assert_eq!(options.search_mode(), SearchMode::Bounded);
        let back = serde_json::to_string(&options).unwrap();
        let again: SearchOptions = serde_json::from_str(&back).unwrap();
        assert_eq!(options, again);
    }
}
