#[allow(non_snake_case)]
pub mod Chemistry;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod FormulaFinder;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;
