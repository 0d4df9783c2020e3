/// periodic table: average, monoisotopic and nominal masses and default charges of the elements
pub mod element_table;
/// special names for groups of atoms (Me, Ph, amino acid residues...) with their formulas and charges
pub mod abbreviations;
/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///  # Examples
/// ```
/// use chemfinder::Chemistry::element_table::ElementTable;
/// use chemfinder::Chemistry::molmass::{calculate_molar_mass, parse_formula};
/// let table = ElementTable::default();
/// let (molar_mass, element_composition) = calculate_molar_mass("C6H8O6", None, &table).unwrap();
/// println!("Element counts: {:?}", element_composition);
/// println!("Molar mass: {:?} g/mol", molar_mass);
/// let atomic_composition = parse_formula("Na(NO3)2", None, &table).unwrap();
/// assert_eq!(atomic_composition["O"], 6);
/// ```
pub mod molmass;
/// lookup traits consumed by the formula finder and their built-in implementation
pub mod tables;
