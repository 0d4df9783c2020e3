//! Results of the formula finder: empirical formula rendering, sort keys and presentation.
use crate::FormulaFinder::candidate::FormulaToken;
use crate::FormulaFinder::errors::FinderError;
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::collections::BTreeMap;

// count bytes below this value encode the count directly
const SORT_KEY_ESCAPE: u8 = 221;

/// Tokens with counts in canonical order: C, H, then the other labels alphabetically.
/// Zero counts are dropped.
pub fn canonical_tokens(counts: impl IntoIterator<Item = (FormulaToken, u32)>) -> Vec<(FormulaToken, u32)> {
    let mut tokens: Vec<(FormulaToken, u32)> = counts.into_iter().filter(|(_, n)| *n > 0).collect();
    tokens.sort_by(|a, b| a.0.cmp(&b.0));
    tokens
}

/// renders canonical tokens, the count is written only when it is above 1
pub fn render_formula(tokens: &[(FormulaToken, u32)]) -> String {
    let mut formula = String::new();
    for (token, count) in tokens {
        formula.push_str(&token.label());
        if *count > 1 {
            formula.push_str(&count.to_string());
        }
    }
    formula
}

fn push_count(key: &mut Vec<u8>, count: u32) {
    if count < SORT_KEY_ESCAPE as u32 {
        key.push(count as u8);
    } else if count <= u16::MAX as u32 {
        key.push(SORT_KEY_ESCAPE);
        key.extend_from_slice(&(count as u16).to_be_bytes());
    } else {
        key.push(SORT_KEY_ESCAPE + 1);
        key.extend_from_slice(&count.to_be_bytes());
    }
}

/// Byte key whose lexicographic order is the canonical formula order:
/// token by token (C, H, then alphabetical), equal tokens by ascending count, shorter formulas first.
/// Each token is written as rank byte, label bytes, a 0 terminator and the count.
pub fn sort_key(tokens: &[(FormulaToken, u32)]) -> Vec<u8> {
    let mut key = Vec::with_capacity(tokens.len() * 4);
    for (token, count) in tokens {
        key.push(token.rank() + 1);
        key.extend_from_slice(token.label().as_bytes());
        key.push(0);
        push_count(&mut key, *count);
    }
    key
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub empirical_formula: String,
    pub counts_by_element: BTreeMap<String, u32>,
    pub mass: f64,
    pub delta_mass: f64,
    pub delta_mass_is_ppm: bool,
    pub charge_state: i32,
    pub mz: f64,
    pub percent_composition: BTreeMap<String, f64>,
    #[serde(skip)]
    pub sort_key: Vec<u8>,
}

impl SearchResult {
    /// `tokens` must be canonical, `masses` holds the unit mass of every token
    pub fn new(
        tokens: &[(FormulaToken, u32)],
        masses: &[f64],
        mass: f64,
        delta_mass: f64,
        delta_mass_is_ppm: bool,
        charge_state: i32,
        mz: f64,
    ) -> Self {
        let mut counts_by_element = BTreeMap::new();
        let mut percent_composition = BTreeMap::new();
        for ((token, count), unit_mass) in tokens.iter().zip(masses) {
            let label = token.label();
            let percent = if mass > 0.0 {
                *count as f64 * unit_mass / mass * 100.0
            } else {
                0.0
            };
            counts_by_element.insert(label.clone(), *count);
            percent_composition.insert(label, percent);
        }
        Self {
            empirical_formula: render_formula(tokens),
            counts_by_element,
            mass,
            delta_mass,
            delta_mass_is_ppm,
            charge_state,
            mz,
            percent_composition,
            sort_key: sort_key(tokens),
        }
    }

    pub fn count_of(&self, symbol: &str) -> u32 {
        self.counts_by_element.get(symbol).copied().unwrap_or(0)
    }
}

/// sorts results by their sort keys
pub fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
}

/// prints results as a table
pub fn pretty_print_results(results: &[SearchResult]) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Formula"),
        Cell::new("Mass"),
        Cell::new("Delta"),
        Cell::new("Charge"),
        Cell::new("m/z"),
        Cell::new("Percent composition"),
    ]));
    for result in results {
        let unit = if result.delta_mass_is_ppm { "ppm" } else { "Da" };
        let composition = result
            .percent_composition
            .iter()
            .map(|(symbol, percent)| format!("{}: {:.2}%", symbol, percent))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::new(vec![
            Cell::new(&result.empirical_formula),
            Cell::new(&format!("{:.5}", result.mass)),
            Cell::new(&format!("{:.5} {}", result.delta_mass, unit)),
            Cell::new(&result.charge_state.to_string()),
            Cell::new(&format!("{:.5}", result.mz)),
            Cell::new(&composition),
        ]));
    }
    table.printstd();
}

/// results as a pretty JSON array
pub fn results_to_json(results: &[SearchResult]) -> Result<String, FinderError> {
    Ok(serde_json::to_string_pretty(results)?)
}
