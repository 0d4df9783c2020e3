/// numbered demos of the formula finder
pub mod formula_finder_examples;
