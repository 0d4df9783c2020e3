//! # Formula Finder
//!
//! Combinatorial search for empirical formulas. Candidate elements (element symbols, group
//! abbreviations such as `Ph` or bare masses such as `"100"`) are combined into formulas whose
//! mass lies within a tolerance of a target mass (Da or ppm), whose m/z matches a target m/z, or
//! whose percent composition matches target percents.
//!
//! ## Algorithms
//! - **Thorough**: depth-first enumeration of multisets of candidates pruned by mass, count
//!   ranges are ignored
//! - **Bounded**: odometer over explicit per candidate [min, max] count ranges with
//!   branch-and-bound on the partial mass
//!
//! Each hit is checked by a pluggable hydrogen saturation rule and, when asked for, by the
//! empirical charge and m/z. Results are deduplicated by formula and sorted C, H, then
//! alphabetically.
//!
//! ## Example
//! ```rust, ignore
//! use chemfinder::FormulaFinder::finder::FormulaFinder;
//! use chemfinder::FormulaFinder::results::pretty_print_results;
//! let finder = FormulaFinder::new();
//! let results = finder.find_matches_by_mass(180.16, 0.01, None);
//! pretty_print_results(&results);
//! ```
pub mod bounded_search;
/// candidate elements and their resolution from user keys
pub mod candidate;
/// abort flag, progress and operation count estimates
pub mod control;
/// search engine trait, algorithm dispatch and the per search context
pub mod engine;
pub mod errors;
/// public API
pub mod finder;
mod finder_tests;
pub mod options;
/// notifications raised while searching
pub mod reporter;
/// results, canonical formula rendering and sort keys
pub mod results;
pub mod thorough_search;
/// hydrogen rule, empirical charge and m/z checks
pub mod verifier;
