/// Module with the periodic table data used by the formula finder:
/// average atomic weights, monoisotopic masses and the default charge (valence)
/// that the charge heuristics of the finder assign to each element
///
use serde::{Deserialize, Serialize};

/// which mass is reported for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ElementMassMode {
    /// standard atomic weight (natural isotopic abundance)
    #[default]
    Average,
    /// mass of the most abundant isotope
    Isotopic,
    /// nominal (rounded monoisotopic) mass
    Integer,
}

// Define a struct to hold element data
#[derive(Debug, Clone, Copy)]
pub struct Element {
    pub name: &'static str,
    pub atomic_mass: f64,
    pub isotopic_mass: f64,
    pub charge: f64,
}

const fn el(name: &'static str, atomic_mass: f64, isotopic_mass: f64, charge: f64) -> Element {
    Element {
        name,
        atomic_mass,
        isotopic_mass,
        charge,
    }
}

// Define a list of elements: symbol, average mass, monoisotopic mass, default charge
pub const ELEMENTS: &[Element] = &[
    el("H", 1.00794, 1.0078250321, 1.0),
    el("He", 4.002602, 4.0026032497, 0.0),
    el("Li", 6.941, 7.016004, 1.0),
    el("Be", 9.012182, 9.0121821, 2.0),
    el("B", 10.811, 11.0093055, 3.0),
    el("C", 12.0107, 12.0, 4.0),
    el("N", 14.0067, 14.0030740052, -3.0),
    el("O", 15.9994, 15.9949146221, -2.0),
    el("F", 18.9984032, 18.9984032, -1.0),
    el("Ne", 20.1797, 19.9924401759, 0.0),
    el("Na", 22.98977, 22.98976967, 1.0),
    el("Mg", 24.305, 23.9850419, 2.0),
    el("Al", 26.981538, 26.98153844, 3.0),
    el("Si", 28.0855, 27.9769265327, 4.0),
    el("P", 30.973761, 30.97376151, -3.0),
    el("S", 32.065, 31.97207069, -2.0),
    el("Cl", 35.453, 34.96885271, -1.0),
    el("Ar", 39.948, 39.962383123, 0.0),
    el("K", 39.0983, 38.9637069, 1.0),
    el("Ca", 40.078, 39.9625912, 2.0),
    el("Sc", 44.95591, 44.9559102, 3.0),
    el("Ti", 47.867, 47.9479471, 4.0),
    el("V", 50.9415, 50.9439637, 5.0),
    el("Cr", 51.9961, 51.9405119, 3.0),
    el("Mn", 54.938049, 54.9380496, 2.0),
    el("Fe", 55.845, 55.9349421, 3.0),
    el("Co", 58.9332, 58.9332002, 2.0),
    el("Ni", 58.6934, 57.9353479, 2.0),
    el("Cu", 63.546, 62.9296011, 2.0),
    el("Zn", 65.409, 63.9291466, 2.0),
    el("Ga", 69.723, 68.925581, 3.0),
    el("Ge", 72.64, 73.9211782, 4.0),
    el("As", 74.9216, 74.9215964, -3.0),
    el("Se", 78.96, 79.9165218, -2.0),
    el("Br", 79.904, 78.9183376, -1.0),
    el("Kr", 83.798, 83.911507, 0.0),
    el("Rb", 85.4678, 84.9117893, 1.0),
    el("Sr", 87.62, 87.9056143, 2.0),
    el("Y", 88.90585, 88.9058479, 3.0),
    el("Zr", 91.224, 89.9047037, 4.0),
    el("Nb", 92.90638, 92.9063775, 5.0),
    el("Mo", 95.94, 97.9054078, 6.0),
    el("Tc", 98.0, 97.907216, 7.0),
    el("Ru", 101.07, 101.9043495, 4.0),
    el("Rh", 102.9055, 102.905504, 3.0),
    el("Pd", 106.42, 105.903483, 2.0),
    el("Ag", 107.8682, 106.905093, 1.0),
    el("Cd", 112.411, 113.903358, 2.0),
    el("In", 114.818, 114.903878, 3.0),
    el("Sn", 118.71, 119.9021966, 4.0),
    el("Sb", 121.76, 120.903818, -3.0),
    el("Te", 127.6, 129.9062228, -2.0),
    el("I", 126.90447, 126.904468, -1.0),
    el("Xe", 131.293, 131.9041545, 0.0),
    el("Cs", 132.90545, 132.905447, 1.0),
    el("Ba", 137.327, 137.905241, 2.0),
    el("La", 138.9055, 138.906348, 3.0),
    el("Ce", 140.116, 139.905434, 3.0),
    el("Gd", 157.25, 157.924101, 3.0),
    el("W", 183.84, 183.950933, 6.0),
    el("Re", 186.207, 186.955751, 7.0),
    el("Os", 190.23, 191.961479, 4.0),
    el("Ir", 192.217, 192.962924, 4.0),
    el("Pt", 195.078, 194.964774, 4.0),
    el("Au", 196.96655, 196.966552, 3.0),
    el("Hg", 200.59, 201.970626, 2.0),
    el("Tl", 204.3833, 204.974412, 1.0),
    el("Pb", 207.2, 207.976636, 2.0),
    el("Bi", 208.98038, 208.980383, 3.0),
    el("Th", 232.0381, 232.0380504, 4.0),
    el("U", 238.02891, 238.0507826, 6.0),
];

/// element data viewed through one mass mode
#[derive(Debug, Clone, Copy)]
pub struct ElementTable {
    pub mass_mode: ElementMassMode,
}

impl ElementTable {
    pub fn new(mass_mode: ElementMassMode) -> Self {
        Self { mass_mode }
    }

    pub fn find(&self, symbol: &str) -> Option<&'static Element> {
        ELEMENTS.iter().find(|e| e.name == symbol)
    }

    pub fn is_element(&self, symbol: &str) -> bool {
        self.find(symbol).is_some()
    }

    /// mass of one atom of the element in the current mass mode
    pub fn mass(&self, symbol: &str) -> Option<f64> {
        self.find(symbol).map(|e| match self.mass_mode {
            ElementMassMode::Average => e.atomic_mass,
            ElementMassMode::Isotopic => e.isotopic_mass,
            ElementMassMode::Integer => e.isotopic_mass.round(),
        })
    }

    pub fn charge(&self, symbol: &str) -> Option<f64> {
        self.find(symbol).map(|e| e.charge)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &'static str> {
        ELEMENTS.iter().map(|e| e.name)
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::new(ElementMassMode::Average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mass_modes() {
        let average = ElementTable::new(ElementMassMode::Average);
        let isotopic = ElementTable::new(ElementMassMode::Isotopic);
        let integer = ElementTable::new(ElementMassMode::Integer);
        assert_relative_eq!(average.mass("C").unwrap(), 12.0107, epsilon = 1e-9);
        assert_relative_eq!(isotopic.mass("C").unwrap(), 12.0, epsilon = 1e-9);
        assert_relative_eq!(isotopic.mass("H").unwrap(), 1.0078250321, epsilon = 1e-9);
        assert_relative_eq!(integer.mass("Cl").unwrap(), 35.0, epsilon = 1e-9);
        assert_eq!(average.mass("Xx"), None);
    }

    #[test]
    fn test_symbols_are_unique() {
        let table = ElementTable::default();
        let mut symbols: Vec<&str> = table.symbols().collect();
        let n = symbols.len();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), n);
        assert!(table.is_element("Si"));
        assert_eq!(table.charge("N"), Some(-3.0));
    }
}
