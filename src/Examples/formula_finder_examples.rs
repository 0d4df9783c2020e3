use crate::Chemistry::element_table::ElementMassMode;
use crate::Chemistry::molmass::calculate_molar_mass;
use crate::Chemistry::tables::ChemistryTables;
use crate::FormulaFinder::candidate::CandidateTolerance;
use crate::FormulaFinder::finder::FormulaFinder;
use crate::FormulaFinder::options::{SearchMode, SearchOptions};
use crate::FormulaFinder::results::{pretty_print_results, results_to_json};
use crate::settings::FinderSettings;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub fn formula_finder_examples(task: usize) {
    match task {
        0 => {
            // glucose-like target with the default candidates C, H, N, O
            let finder = FormulaFinder::new();
            let results = finder.find_matches_by_mass(180.16, 0.01, None);
            pretty_print_results(&results);
        }
        1 => {
            // monoisotopic masses, 5 ppm window
            let mut finder = FormulaFinder::with_mass_mode(ElementMassMode::Isotopic);
            finder.add_candidate_element("S");
            let results = finder.find_matches_by_mass_ppm(180.0634, 5.0, None);
            pretty_print_results(&results);
        }
        2 => {
            // percent composition C 70 %, H 10 %, N 10 %, O 10 %
            let finder = FormulaFinder::new();
            let results = finder.find_matches_by_percent_composition(200.0, 5.0, None);
            println!("{} formulas", results.len());
            pretty_print_results(&results);
        }
        3 => {
            // explicit count ranges
            let mut finder = FormulaFinder::new();
            let mut candidates = BTreeMap::new();
            candidates.insert("C".to_string(), CandidateTolerance::with_counts(4, 8));
            candidates.insert("H".to_string(), CandidateTolerance::with_counts(0, 20));
            candidates.insert("O".to_string(), CandidateTolerance::with_counts(0, 8));
            candidates.insert("Cl".to_string(), CandidateTolerance::with_counts(0, 2));
            finder.set_candidate_elements(candidates);
            let mut options = SearchOptions::default();
            options.set_search_mode(SearchMode::Bounded);
            let results = finder.find_matches_by_mass(180.16, 0.05, Some(&options));
            pretty_print_results(&results);
        }
        4 => {
            // target m/z with charges up to 2
            let mut finder = FormulaFinder::new();
            finder.set_candidate_elements(
                ["C", "H", "N", "O"]
                    .iter()
                    .map(|k| (k.to_string(), CandidateTolerance::default()))
                    .collect(),
            );
            let mut options = SearchOptions::default();
            options.set_find_target_mz(true);
            options.set_charge_range(-2, 2);
            let results = finder.find_matches_by_mass(15.035, 0.01, Some(&options));
            pretty_print_results(&results);
        }
        5 => {
            // abbreviations and a bare mass as candidates
            let mut finder = FormulaFinder::new();
            finder.add_candidate_element("Ph");
            finder.add_candidate_element("Me");
            finder.add_candidate_element("113.5");
            let results = finder.find_matches_by_mass(250.0, 0.5, None);
            match results_to_json(&results) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("failed to serialize results: {}", e),
            }
        }
        6 => {
            // stop a long search from another thread
            let mut finder = FormulaFinder::new();
            for key in ["S", "P", "Cl", "Br", "F", "Si"] {
                finder.add_candidate_element(key);
            }
            finder.set_progress_callback(Some(Arc::new(|percent: f64| {
                println!("progress {:.4} %", percent);
            })));
            let handle = finder.abort_handle();
            let aborter = thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                handle.abort();
            });
            let results = finder.find_matches_by_mass(5000.0, 0.001, None);
            let _ = aborter.join();
            println!("{} formulas found before the abort", results.len());
        }
        7 => {
            // settings round trip
            let path = "formula_finder_settings.json";
            let settings = match FinderSettings::from_json_file(path) {
                Ok(settings) => settings,
                Err(e) => {
                    println!("{}, using defaults", e);
                    FinderSettings::default()
                }
            };
            let mut finder = FormulaFinder::from_settings(&settings);
            finder.set_maximum_hits(10);
            let results = finder.find_matches_by_mass(180.16, 0.01, None);
            pretty_print_results(&results);
            if let Err(e) = finder.settings().save_to_json_file(path) {
                println!("failed to save settings: {}", e);
            }
        }
        8 => {
            // formula weights used by the finder
            let tables = ChemistryTables::default();
            for formula in ["C6H12O6", "Ca(NO3)2", "PhCl", "(C4H2N(C6H5C))4H2"] {
                match calculate_molar_mass(formula, Some(&tables.abbreviations), &tables.elements) {
                    Ok((mass, composition)) => {
                        println!("{}: {:.4} g/mol {:?}", formula, mass, composition)
                    }
                    Err(e) => println!("{}: {}", formula, e),
                }
            }
        }
        _ => {
            println!("no such example: {}", task);
        }
    }
}
