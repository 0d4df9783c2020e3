#[cfg(test)]
mod tests {
    use crate::Chemistry::element_table::ElementMassMode;
    use crate::FormulaFinder::candidate::CandidateTolerance;
    use crate::FormulaFinder::errors::FinderError;
    use crate::FormulaFinder::finder::{FormulaFinder, MAXIMUM_ALLOWED_RESULTS_TO_FIND};
    use crate::FormulaFinder::options::{SearchMode, SearchOptions};
    use crate::FormulaFinder::reporter::{FinderEvent, RecordingReporter};
    use crate::FormulaFinder::results::SearchResult;
    use crate::FormulaFinder::verifier::{AtomCounts, HydrogenPolicy, ValenceSaturationRule};
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn formulas(results: &[SearchResult]) -> Vec<String> {
        results.iter().map(|r| r.empirical_formula.clone()).collect()
    }

    fn candidates(keys: &[&str]) -> BTreeMap<String, CandidateTolerance> {
        keys.iter()
            .map(|k| (k.to_string(), CandidateTolerance::default()))
            .collect()
    }

    fn recording_finder() -> (FormulaFinder, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        let mut finder = FormulaFinder::new();
        finder.set_reporter(reporter.clone());
        (finder, reporter)
    }

    /// ten candidates and a target no composition reaches exactly: runs until aborted
    fn endless_finder() -> FormulaFinder {
        let mut finder = FormulaFinder::new();
        finder.set_candidate_elements(candidates(&[
            "C", "H", "N", "O", "S", "P", "Cl", "Br", "F", "Si",
        ]));
        finder
    }

    #[test]
    fn test_glucose_by_mass() {
        let finder = FormulaFinder::new();
        let results = finder.find_matches_by_mass(180.16, 0.01, None);
        assert!(formulas(&results).contains(&"C6H12O6".to_string()));
        for result in &results {
            assert!((result.mass - 180.16).abs() <= 0.01);
            assert!(!result.delta_mass_is_ppm);
            assert_relative_eq!(result.delta_mass, result.mass - 180.16, epsilon = 1e-9);
        }
        let glucose = results
            .iter()
            .find(|r| r.empirical_formula == "C6H12O6")
            .unwrap();
        assert_eq!(glucose.count_of("C"), 6);
        assert_eq!(glucose.count_of("H"), 12);
        assert_eq!(glucose.count_of("O"), 6);
        assert_eq!(glucose.count_of("N"), 0);
        let total: f64 = glucose.percent_composition.values().sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_results_respect_hydrogen_bound() {
        let finder = FormulaFinder::new();
        let results = finder.find_matches_by_mass(250.0, 0.05, None);
        assert!(!results.is_empty());
        let rule = ValenceSaturationRule;
        for result in &results {
            let atoms = AtomCounts {
                c: result.count_of("C") as i64,
                n: result.count_of("N") as i64,
                o: result.count_of("O") as i64,
                h: result.count_of("H") as i64,
                ..AtomCounts::default()
            };
            assert!(atoms.h <= rule.max_hydrogens(&atoms), "{}", result.empirical_formula);
        }
    }

    #[test]
    fn test_percent_composition_scenario() {
        let finder = FormulaFinder::new();
        let results = finder.find_matches_by_percent_composition(200.0, 5.0, None);
        assert!(!results.is_empty());
        let targets = [("C", 70.0), ("H", 10.0), ("N", 10.0), ("O", 10.0)];
        for result in &results {
            assert!(result.mass <= 200.0);
            for (symbol, target) in targets {
                assert!(result.count_of(symbol) > 0, "{} lacks {}", result.empirical_formula, symbol);
                let percent = result.percent_composition[symbol];
                assert!(
                    (percent - target).abs() <= 5.0 + 1e-9,
                    "{} has {} % {}",
                    result.empirical_formula,
                    percent,
                    symbol
                );
            }
            assert_relative_eq!(result.delta_mass, 0.0);
        }
        assert!(formulas(&results).contains(&"C11H18NO".to_string()));
    }

    #[test]
    fn test_ppm_search() {
        let mut finder = FormulaFinder::with_mass_mode(ElementMassMode::Isotopic);
        finder.set_candidate_elements(candidates(&["C", "H", "N", "O"]));
        let target = 180.0634;
        let results = finder.find_matches_by_mass_ppm(target, 5.0, None);
        assert!(formulas(&results).contains(&"C6H12O6".to_string()));
        for result in &results {
            assert!(result.delta_mass_is_ppm);
            assert!(((result.mass / target - 1.0) * 1e6).abs() <= 5.0 + 1e-9);
            assert_relative_eq!(
                result.delta_mass,
                (result.mass - target) / target * 1e6,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_bounded_matches_thorough_when_ranges_cover_everything() {
        let mut finder = FormulaFinder::new();
        let mut map = BTreeMap::new();
        map.insert("C".to_string(), CandidateTolerance::with_counts(0, 15));
        map.insert("H".to_string(), CandidateTolerance::with_counts(0, 180));
        map.insert("O".to_string(), CandidateTolerance::with_counts(0, 11));
        finder.set_candidate_elements(map);

        let thorough = finder.find_matches_by_mass(180.16, 0.01, None);
        let mut options = SearchOptions::default();
        options.set_search_mode(SearchMode::Bounded);
        let bounded = finder.find_matches_by_mass(180.16, 0.01, Some(&options));
        assert!(formulas(&bounded).contains(&"C6H12O6".to_string()));
        assert_eq!(formulas(&thorough), formulas(&bounded));
    }

    #[test]
    fn test_bounded_respects_count_ranges() {
        let mut finder = FormulaFinder::new();
        let mut map = BTreeMap::new();
        map.insert("C".to_string(), CandidateTolerance::with_counts(5, 7));
        map.insert("H".to_string(), CandidateTolerance::with_counts(0, 20));
        map.insert("O".to_string(), CandidateTolerance::with_counts(0, 10));
        map.insert("N".to_string(), CandidateTolerance::with_counts(0, 0));
        finder.set_candidate_elements(map);
        let mut options = SearchOptions::default();
        options.set_search_mode(SearchMode::Bounded);
        let results = finder.find_matches_by_mass(180.16, 0.05, Some(&options));
        assert!(formulas(&results).contains(&"C6H12O6".to_string()));
        for result in &results {
            assert!((5..=7).contains(&result.count_of("C")));
            assert!(result.count_of("H") <= 20);
            assert_eq!(result.count_of("N"), 0);
        }
    }

    #[test]
    fn test_bounded_percent_search() {
        let mut finder = FormulaFinder::new();
        let mut map = BTreeMap::new();
        map.insert("C".to_string(), CandidateTolerance::new(75.0, 1, 2));
        map.insert("H".to_string(), CandidateTolerance::new(25.0, 1, 12));
        finder.set_candidate_elements(map);
        let mut options = SearchOptions::default();
        options.set_search_mode(SearchMode::Bounded);
        options.set_verify_hydrogens(false);
        let results = finder.find_matches_by_percent_composition(50.0, 2.0, Some(&options));
        // CH4 74.9 % and C2H8 74.9 % carbon
        assert_eq!(formulas(&results), vec!["CH4".to_string(), "C2H8".to_string()]);
    }

    #[test]
    fn test_target_mz_mode() {
        let mut finder = FormulaFinder::new();
        finder.set_candidate_elements(candidates(&["C", "H"]));
        let mut options = SearchOptions::default();
        options.set_find_target_mz(true);
        options.set_charge_range(-2, 2);
        let results = finder.find_matches_by_mass(15.035, 0.01, Some(&options));
        // C2H6 sits in the doubled window but is neutral
        assert_eq!(formulas(&results), vec!["CH3".to_string()]);
        let methyl = &results[0];
        assert_eq!(methyl.charge_state, 1);
        assert!((methyl.mz - 15.035).abs() <= 0.01);
    }

    #[test]
    fn test_target_mz_with_ppm_tolerance() {
        let mut finder = FormulaFinder::with_mass_mode(ElementMassMode::Isotopic);
        finder.set_candidate_elements(candidates(&["C", "H"]));
        let mut options = SearchOptions::default();
        options.set_find_target_mz(true);
        options.set_charge_range(2, 3);
        let target_mz = 35.0391;
        let tolerance_da = target_mz * 5.0 / 1e6;
        let results = finder.find_matches_by_mass_ppm(target_mz, 5.0, Some(&options));
        // C5H10 carries charge +2, nothing fits the tripled window
        assert_eq!(formulas(&results), vec!["C5H10".to_string()]);
        let pentene = &results[0];
        assert_eq!(pentene.charge_state, 2);
        assert!((pentene.mz - target_mz).abs() <= tolerance_da);
        assert!((pentene.mass - target_mz * 2.0).abs() <= tolerance_da * 2.0);
        assert!(pentene.delta_mass_is_ppm);
        assert_relative_eq!(
            pentene.delta_mass,
            (pentene.mass - target_mz * 2.0) / (target_mz * 2.0) * 1e6,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_charge_range_limit() {
        let mut finder = FormulaFinder::new();
        finder.set_candidate_elements(candidates(&["C", "H"]));
        let mut options = SearchOptions::default();
        options.set_limit_charge_range(true);
        options.set_charge_range(0, 0);
        // CH3 (+1) is rejected, CH4 is neutral
        let results = finder.find_matches_by_mass(15.5, 0.6, Some(&options));
        assert_eq!(formulas(&results), vec!["CH4".to_string()]);
        assert_eq!(results[0].charge_state, 0);
        assert_relative_eq!(results[0].mz, 0.0);
    }

    #[test]
    fn test_custom_mass_candidate() {
        let mut finder = FormulaFinder::new();
        finder.set_candidate_elements(candidates(&["C", "100"]));
        let results = finder.find_matches_by_mass(124.0214, 0.001, None);
        assert_eq!(formulas(&results), vec!["C2C1_".to_string()]);
        assert_eq!(results[0].count_of("C1_"), 1);
    }

    #[test]
    fn test_abbreviation_candidate() {
        let mut finder = FormulaFinder::new();
        finder.set_candidate_elements(candidates(&["Ph", "Cl"]));
        let mut options = SearchOptions::default();
        options.set_find_charge(false);
        // chlorobenzene C6H5Cl
        let results = finder.find_matches_by_mass(112.56, 0.01, Some(&options));
        assert_eq!(formulas(&results), vec!["ClPh".to_string()]);
    }

    #[test]
    fn test_maximum_hits_boundary() {
        let (mut finder, reporter) = recording_finder();
        finder.set_maximum_hits(1);
        let results = finder.find_matches_by_mass(180.16, 0.01, None);
        assert_eq!(results.len(), 1);

        finder.set_maximum_hits(MAXIMUM_ALLOWED_RESULTS_TO_FIND + 1);
        assert_eq!(finder.maximum_hits(), MAXIMUM_ALLOWED_RESULTS_TO_FIND);
        finder.set_maximum_hits(0);
        assert_eq!(finder.maximum_hits(), 1);
        assert_eq!(reporter.warnings().len(), 2);
    }

    #[test]
    fn test_determinism_and_order() {
        let finder = FormulaFinder::new();
        let first = finder.find_matches_by_mass(300.0, 0.02, None);
        let second = finder.find_matches_by_mass(300.0, 0.02, None);
        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].sort_key < w[1].sort_key));
        assert_relative_eq!(finder.percent_complete(), 100.0);
    }

    #[test]
    fn test_idempotent_after_reset() {
        let mut finder = FormulaFinder::new();
        let before = finder.find_matches_by_mass(180.16, 0.01, None);
        finder.add_candidate_element("S");
        finder.set_maximum_hits(3);
        finder.reset();
        assert_eq!(finder.maximum_hits(), 1000);
        assert_eq!(finder.candidate_elements().len(), 4);
        let after = finder.find_matches_by_mass(180.16, 0.01, None);
        assert_eq!(before, after);
    }

    #[test]
    fn test_candidate_management() {
        let mut finder = FormulaFinder::new();
        finder.add_candidate_with_percent("S", 5.0);
        finder.add_candidate_with_counts("S", 1, 4);
        let sulfur = finder.candidate_elements()["S"];
        assert_eq!((sulfur.min_count, sulfur.max_count), (1, 4));
        assert_relative_eq!(sulfur.target_percent, 0.0);
        assert!(finder.remove_candidate_element("S"));
        assert!(!finder.remove_candidate_element("S"));
        finder.add_candidate_with_tolerance("Br", CandidateTolerance::new(150.0, 0, 70000));
        let bromine = finder.candidate_elements()["Br"];
        assert_relative_eq!(bromine.target_percent, 100.0);
        assert_eq!(bromine.max_count, 65565);
    }

    #[test]
    fn test_invalid_candidate_is_reported() {
        let (mut finder, reporter) = recording_finder();
        finder.add_candidate_element("Xx");
        let results = finder.find_matches_by_mass(180.16, 0.01, None);
        assert!(results.is_empty());
        let errors = reporter.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'Xx'"));
        match finder.try_find_matches_by_mass(180.16, 0.01, None) {
            Err(FinderError::InvalidCandidateElement { key }) => assert_eq!(key, "Xx"),
            other => panic!("unexpected outcome {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_invalid_configuration_is_reported() {
        let (mut finder, reporter) = recording_finder();
        assert!(finder.find_matches_by_mass(-1.0, 0.01, None).is_empty());
        assert!(finder.find_matches_by_mass(100.0, -0.01, None).is_empty());
        assert!(finder.find_matches_by_mass_ppm(100.0, f64::NAN, None).is_empty());
        assert_eq!(reporter.errors().len(), 3);

        // percents sum to 110
        finder.add_candidate_with_percent("S", 10.0);
        assert!(matches!(
            finder.try_find_matches_by_percent_composition(200.0, 5.0, None),
            Err(FinderError::InvalidSearchConfiguration(_))
        ));

        finder.set_candidate_elements(BTreeMap::new());
        assert!(matches!(
            finder.try_find_matches_by_mass(100.0, 0.1, None),
            Err(FinderError::InvalidSearchConfiguration(_))
        ));
    }

    #[test]
    fn test_abort_from_progress_callback() {
        let mut finder = endless_finder();
        let reporter = Arc::new(RecordingReporter::new());
        finder.set_reporter(reporter.clone());
        let handle = finder.abort_handle();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        finder.set_progress_callback(Some(Arc::new(move |_percent: f64| {
            if counter.fetch_add(1, Ordering::SeqCst) >= 2 {
                handle.abort();
            }
        })));
        let results = finder.find_matches_by_mass(20000.0, 0.0, None);
        assert!(results.len() <= finder.maximum_hits());
        assert!(calls.load(Ordering::SeqCst) >= 3);
        assert!(
            reporter
                .events()
                .iter()
                .any(|e| matches!(e, FinderEvent::Message(text) if text.contains("aborted")))
        );
        // the flag is cleared for the next search
        assert!(!finder.abort_handle().is_aborted());
        assert_relative_eq!(finder.percent_complete(), 100.0);
    }

    #[test]
    fn test_abort_from_another_thread() {
        let finder = endless_finder();
        let handle = finder.abort_handle();
        let aborter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.abort();
        });
        let results = finder.find_matches_by_mass(20000.0, 0.0, None);
        aborter.join().unwrap();
        assert!(results.len() <= finder.maximum_hits());
        assert!(!finder.abort_handle().is_aborted());
    }

    #[test]
    fn test_pending_abort_cancels_next_search() {
        let (finder, reporter) = recording_finder();
        finder.abort_processing_now();
        let results = finder.find_matches_by_mass(180.16, 0.01, None);
        assert!(results.is_empty());
        assert!(reporter.errors().is_empty());
        // the abort was consumed
        let results = finder.find_matches_by_mass(180.16, 0.01, None);
        assert!(formulas(&results).contains(&"C6H12O6".to_string()));
    }

    #[test]
    fn test_heavy_searches_on_worker_thread() {
        let worker = thread::spawn(|| {
            let mut finder = FormulaFinder::new();
            finder.set_candidate_elements(candidates(&["C", "H"]));
            let by_mass = finder.find_matches_by_mass(40000.0, 0.01, None);

            let mut percents = BTreeMap::new();
            percents.insert("C".to_string(), CandidateTolerance::with_percent(85.6));
            percents.insert("H".to_string(), CandidateTolerance::with_percent(14.4));
            finder.set_candidate_elements(percents);
            finder.set_maximum_hits(MAXIMUM_ALLOWED_RESULTS_TO_FIND);
            let by_percent = finder.find_matches_by_percent_composition(3000.0, 0.05, None);
            (by_mass, by_percent)
        });
        let (by_mass, by_percent) = worker.join().unwrap();
        assert!(by_mass.iter().all(|r| (r.mass - 40000.0).abs() <= 0.01));
        // CnH2n holds 85.63 % carbon
        assert!(formulas(&by_percent).contains(&"C100H200".to_string()));
        for result in &by_percent {
            assert!(result.mass <= 3000.0);
            assert!((result.percent_composition["C"] - 85.6).abs() <= 0.05 + 1e-9);
        }
    }

    #[derive(Debug)]
    struct NoHydrogens;

    impl HydrogenPolicy for NoHydrogens {
        fn max_hydrogens(&self, _atoms: &AtomCounts) -> i64 {
            0
        }
    }

    #[test]
    fn test_custom_hydrogen_policy() {
        let mut finder = FormulaFinder::new();
        finder.set_hydrogen_policy(Arc::new(NoHydrogens));
        let results = finder.find_matches_by_mass(180.16, 0.01, None);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.count_of("H") == 0));
    }
}
