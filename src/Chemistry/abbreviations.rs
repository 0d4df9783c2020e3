/// Chemical formulae may contain special names for groups of atoms, e.g. Me (methyl) group, which is {"C":1, "H":3}.
/// The finder accepts such groups as search units, so each group carries a defining formula and a charge.
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Abbreviation {
    pub symbol: String,
    pub formula: String,
    pub charge: f64,
}

// symbol, defining formula, charge
const DEFAULT_ABBREVIATIONS: &[(&str, &str, f64)] = &[
    ("Bpy", "C10H8N2", 0.0),
    ("Bu", "C4H9", 1.0),
    ("Et", "CH3CH2", 1.0),
    ("Me", "CH3", 1.0),
    ("Ms", "CH3SOO", -1.0),
    ("Oac", "C2H3O2", -1.0),
    ("Otf", "OSO2CF3", -1.0),
    ("Ox", "C2O4", -2.0),
    ("Ph", "C6H5", 1.0),
    ("Phen", "C12H8N2", 0.0),
    ("Py", "C5H5N", 0.0),
    ("Tpp", "(C4H2N(C6H5C))4H2", 0.0),
    ("Ts", "CH3C6H4SO2", 1.0),
    ("Urea", "H2NCONH2", 0.0),
    // amino acid residues
    ("Ala", "C3H5NO", 0.0),
    ("Arg", "C6H12N4O", 0.0),
    ("Asn", "C4H6N2O2", 0.0),
    ("Asp", "C4H5NO3", 0.0),
    ("Cys", "C3H5NOS", 0.0),
    ("Gln", "C5H8N2O2", 0.0),
    ("Glu", "C5H7NO3", 0.0),
    ("Gly", "C2H3NO", 0.0),
    ("His", "C6H7N3O", 0.0),
    ("Ile", "C6H11NO", 0.0),
    ("Leu", "C6H11NO", 0.0),
    ("Lys", "C6H12N2O", 0.0),
    ("Met", "C5H9NOS", 0.0),
    ("Phe", "C9H9NO", 0.0),
    ("Pro", "C5H7NO", 0.0),
    ("Ser", "C3H5NO2", 0.0),
    ("Thr", "C4H7NO2", 0.0),
    ("Trp", "C11H10N2O", 0.0),
    ("Tyr", "C9H9NO2", 0.0),
    ("Val", "C5H9NO", 0.0),
];

#[derive(Debug, Clone)]
pub struct AbbreviationTable {
    pub groups: HashMap<String, Abbreviation>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// table with the built-in groups and amino acid residues
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (symbol, formula, charge) in DEFAULT_ABBREVIATIONS {
            table.insert(symbol, formula, *charge);
        }
        table
    }

    /// adds or replaces a group
    pub fn insert(&mut self, symbol: &str, formula: &str, charge: f64) {
        self.groups.insert(
            symbol.to_string(),
            Abbreviation {
                symbol: symbol.to_string(),
                formula: formula.to_string(),
                charge,
            },
        );
    }

    pub fn get(&self, symbol: &str) -> Option<&Abbreviation> {
        self.groups.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.groups.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups() {
        let table = AbbreviationTable::with_defaults();
        assert_eq!(table.len(), DEFAULT_ABBREVIATIONS.len());
        let me = table.get("Me").unwrap();
        assert_eq!(me.formula, "CH3");
        assert_eq!(me.charge, 1.0);
        assert!(table.contains("Gly"));
        assert!(!table.contains("C"));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut table = AbbreviationTable::new();
        assert!(table.is_empty());
        table.insert("Xy", "C8H9", 0.0);
        table.insert("Xy", "C8H10", 1.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Xy").unwrap().formula, "C8H10");
    }
}
