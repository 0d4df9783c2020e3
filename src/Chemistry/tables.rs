//! Lookup services the formula finder consumes: element and group data, and the
//! formula weight of an arbitrary formula. Both are traits so the finder can run
//! against any periodic table implementation; [`ChemistryTables`] is the built-in one.
use crate::Chemistry::abbreviations::AbbreviationTable;
use crate::Chemistry::element_table::{ElementMassMode, ElementTable};
use crate::Chemistry::molmass::{FormulaParseError, calculate_molar_mass};

/// periodic table and group lookups
pub trait ElementLookup {
    fn is_valid_element_symbol(&self, symbol: &str) -> bool;
    /// (mass, charge) of one atom
    fn element_info(&self, symbol: &str) -> Option<(f64, f64)>;
    /// (formula mass, charge) of a group
    fn abbreviation_info(&self, symbol: &str) -> Option<(f64, f64)>;
}

/// computes the mass of a formula
pub trait FormulaWeight {
    fn compute_formula_weight(&self, formula: &str) -> Result<f64, FormulaParseError>;
}

#[derive(Debug, Clone)]
pub struct ChemistryTables {
    pub elements: ElementTable,
    pub abbreviations: AbbreviationTable,
}

impl ChemistryTables {
    pub fn new(mass_mode: ElementMassMode) -> Self {
        Self {
            elements: ElementTable::new(mass_mode),
            abbreviations: AbbreviationTable::with_defaults(),
        }
    }

    pub fn mass_mode(&self) -> ElementMassMode {
        self.elements.mass_mode
    }

    pub fn set_mass_mode(&mut self, mass_mode: ElementMassMode) {
        self.elements.mass_mode = mass_mode;
    }
}

impl Default for ChemistryTables {
    fn default() -> Self {
        Self::new(ElementMassMode::Average)
    }
}

impl ElementLookup for ChemistryTables {
    fn is_valid_element_symbol(&self, symbol: &str) -> bool {
        self.elements.is_element(symbol)
    }

    fn element_info(&self, symbol: &str) -> Option<(f64, f64)> {
        Some((self.elements.mass(symbol)?, self.elements.charge(symbol)?))
    }

    fn abbreviation_info(&self, symbol: &str) -> Option<(f64, f64)> {
        let group = self.abbreviations.get(symbol)?;
        let mass = self.compute_formula_weight(&group.formula).ok()?;
        Some((mass, group.charge))
    }
}

impl FormulaWeight for ChemistryTables {
    fn compute_formula_weight(&self, formula: &str) -> Result<f64, FormulaParseError> {
        calculate_molar_mass(formula, Some(&self.abbreviations), &self.elements).map(|(m, _)| m)
    }
}
