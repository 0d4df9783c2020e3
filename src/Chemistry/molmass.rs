/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///
use crate::Chemistry::abbreviations::AbbreviationTable;
use crate::Chemistry::element_table::ElementTable;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// error types of the formula parser
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaParseError {
    #[error("Empty formula")]
    EmptyFormula,
    #[error("Unknown element or group symbol: {0}")]
    UnknownSymbol(String),
    #[error("Unbalanced parentheses in formula: {0}")]
    UnbalancedParentheses(String),
    #[error("Invalid character '{0}' in formula")]
    InvalidCharacter(char),
    #[error("Misplaced or oversized count '{0}' in formula")]
    InvalidCount(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Symbol(String),
    Open,
    Close,
    Count(String),
    Invalid(char),
}

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"([A-Z][a-z]*)|(\()|(\))|(\d+)|(\S)").unwrap())
}

fn filter_phases_marks(formula: &str) -> String {
    let mut formula = formula.replace(' ', "");
    let phases = ["(c)", "(l)", "(g)", "(s)", "(aq)"];
    for phase in phases {
        formula = formula.replace(phase, "");
    }
    formula
}

fn tokenize(formula: &str) -> Vec<Token> {
    token_regex()
        .captures_iter(formula)
        .map(|caps| {
            if let Some(m) = caps.get(1) {
                Token::Symbol(m.as_str().to_string())
            } else if caps.get(2).is_some() {
                Token::Open
            } else if caps.get(3).is_some() {
                Token::Close
            } else if let Some(m) = caps.get(4) {
                Token::Count(m.as_str().to_string())
            } else {
                // group 5 always matches a single non-space char
                Token::Invalid(caps[0].chars().next().unwrap_or('?'))
            }
        })
        .collect()
}

// returns the stoichiometric coefficient that follows position `i`, 1 if there is none
fn count_after(tokens: &[Token], i: &mut usize) -> Result<usize, FormulaParseError> {
    if let Some(Token::Count(digits)) = tokens.get(*i + 1) {
        *i += 1;
        digits
            .parse::<usize>()
            .map_err(|_| FormulaParseError::InvalidCount(digits.clone()))
    } else {
        Ok(1)
    }
}

// groups like Me are turned into regular elements, i.e. Me is converted into {"C":1, "H":3}
fn handle_groups(
    mut counts: HashMap<String, usize>,
    groups: Option<&AbbreviationTable>,
    elements: &ElementTable,
) -> Result<HashMap<String, usize>, FormulaParseError> {
    if let Some(groups) = groups {
        let found: Vec<(String, usize, String)> = counts
            .iter()
            .filter_map(|(symbol, n)| {
                groups
                    .get(symbol)
                    .map(|group| (symbol.clone(), *n, group.formula.clone()))
            })
            .collect();
        for (chemical_group, number_of_chemical_groups, definition) in found {
            counts.remove(&chemical_group);
            // group definitions contain elements only
            let atomic_composition = parse_formula(&definition, None, elements)?;
            for (atom, quantity) in atomic_composition {
                *counts.entry(atom).or_insert(0) += quantity * number_of_chemical_groups;
            }
        }
    }
    Ok(counts)
}

/// Function to parse a chemical formula and return a HashMap of elements and their counts.
/// Argument `groups` is optional: if the formula contains special names for chemical groups like Me, Ph
/// they are looked up there and expanded into their atoms. Nested parentheses with multipliers are supported,
/// phase marks like (g) or (aq) are ignored.
pub fn parse_formula(
    formula: &str,
    groups: Option<&AbbreviationTable>,
    elements: &ElementTable,
) -> Result<HashMap<String, usize>, FormulaParseError> {
    let formula = filter_phases_marks(formula);
    if formula.is_empty() {
        return Err(FormulaParseError::EmptyFormula);
    }
    let tokens = tokenize(&formula);
    let mut stack: Vec<HashMap<String, usize>> = vec![HashMap::new()];
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Symbol(symbol) => {
                let known = elements.is_element(symbol)
                    || groups.is_some_and(|g| g.contains(symbol));
                if !known {
                    return Err(FormulaParseError::UnknownSymbol(symbol.clone()));
                }
                let count = count_after(&tokens, &mut i)?;
                if let Some(top) = stack.last_mut() {
                    *top.entry(symbol.clone()).or_insert(0) += count;
                }
            }
            Token::Open => stack.push(HashMap::new()),
            Token::Close => {
                if stack.len() < 2 {
                    return Err(FormulaParseError::UnbalancedParentheses(formula.clone()));
                }
                let inner = stack.pop().unwrap_or_default();
                let multiplier = count_after(&tokens, &mut i)?;
                if let Some(top) = stack.last_mut() {
                    for (symbol, n) in inner {
                        *top.entry(symbol).or_insert(0) += n * multiplier;
                    }
                }
            }
            Token::Count(digits) => return Err(FormulaParseError::InvalidCount(digits.clone())),
            Token::Invalid(c) => return Err(FormulaParseError::InvalidCharacter(*c)),
        }
        i += 1;
    }
    if stack.len() != 1 {
        return Err(FormulaParseError::UnbalancedParentheses(formula.clone()));
    }
    let counts = stack.pop().unwrap_or_default();
    debug!("parsed formula {} into {:?}", formula, counts);
    handle_groups(counts, groups, elements)
}

/// Function to calculate the molar mass of a substance given its chemical formula.
/// Returns the mass in the mass mode of `elements` and the atomic composition
pub fn calculate_molar_mass(
    formula: &str,
    groups: Option<&AbbreviationTable>,
    elements: &ElementTable,
) -> Result<(f64, HashMap<String, usize>), FormulaParseError> {
    let counts = parse_formula(formula, groups, elements)?;
    let mut molar_mass = 0.0;
    for (element, count) in counts.iter() {
        let mass = elements
            .mass(element)
            .ok_or_else(|| FormulaParseError::UnknownSymbol(element.clone()))?;
        molar_mass += mass * *count as f64;
    }
    Ok((molar_mass, counts))
}
