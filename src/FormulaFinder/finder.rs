use crate::Chemistry::element_table::ElementMassMode;
use crate::Chemistry::tables::{ChemistryTables, ElementLookup};
use crate::FormulaFinder::candidate::{CandidateTolerance, resolve_candidates};
use crate::FormulaFinder::control::{AbortHandle, ProgressCallback, ProgressTracker, SearchControl};
use crate::FormulaFinder::engine::{SearchAlgorithm, SearchContext, SearchEngine, estimate_operation_count};
use crate::FormulaFinder::errors::FinderError;
use crate::FormulaFinder::options::SearchOptions;
use crate::FormulaFinder::reporter::{EventReporter, LogReporter};
use crate::FormulaFinder::results::{SearchResult, sort_results};
use crate::FormulaFinder::verifier::{HydrogenPolicy, MassTarget, ValenceSaturationRule};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

/// ceiling of `maximum_hits`
pub const MAXIMUM_ALLOWED_RESULTS_TO_FIND: usize = 1_000_000;
pub const DEFAULT_MAXIMUM_HITS: usize = 1000;
/// allowed deviation of the sum of target percents from 100
pub const PERCENT_SUM_EPSILON: f64 = 1e-3;

/// Empirical formula finder.
///
/// Holds the candidate elements (symbols, group abbreviations or bare masses) with their
/// tolerances and searches for the formulas matching a target mass or a percent composition.
///
/// # Example
/// ```rust, ignore
/// let mut finder = FormulaFinder::new();
/// finder.add_candidate_element("Cl");
/// let results = finder.find_matches_by_mass(180.16, 0.01, None);
/// pretty_print_results(&results);
/// ```
pub struct FormulaFinder {
    candidates: BTreeMap<String, CandidateTolerance>,
    maximum_hits: usize,
    options: SearchOptions,
    mass_mode: ElementMassMode,
    lookup: Arc<dyn ElementLookup + Send + Sync>,
    hydrogen_policy: Arc<dyn HydrogenPolicy>,
    reporter: Arc<dyn EventReporter>,
    abort: AbortHandle,
    progress: ProgressTracker,
    progress_callback: Option<ProgressCallback>,
}

impl Default for FormulaFinder {
    fn default() -> Self {
        let mut finder = Self {
            candidates: BTreeMap::new(),
            maximum_hits: DEFAULT_MAXIMUM_HITS,
            options: SearchOptions::default(),
            mass_mode: ElementMassMode::default(),
            lookup: Arc::new(ChemistryTables::default()),
            hydrogen_policy: Arc::new(ValenceSaturationRule),
            reporter: Arc::new(LogReporter),
            abort: AbortHandle::new(),
            progress: ProgressTracker::new(),
            progress_callback: None,
        };
        finder.reset();
        finder
    }
}

impl std::fmt::Debug for FormulaFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormulaFinder")
            .field("candidates", &self.candidates)
            .field("maximum_hits", &self.maximum_hits)
            .field("options", &self.options)
            .field("mass_mode", &self.mass_mode)
            .field("hydrogen_policy", &self.hydrogen_policy)
            .finish()
    }
}

impl FormulaFinder {
    /// finder with the default candidates C, H, N, O and average element masses
    pub fn new() -> Self {
        Self::default()
    }

    /// finder looking elements up in a table of the given mass mode
    pub fn with_mass_mode(mass_mode: ElementMassMode) -> Self {
        let mut finder = Self::default();
        finder.set_mass_mode(mass_mode);
        finder
    }

    pub fn mass_mode(&self) -> ElementMassMode {
        self.mass_mode
    }

    /// switches to the built-in tables in `mass_mode`, replacing any custom lookup
    pub fn set_mass_mode(&mut self, mass_mode: ElementMassMode) {
        self.mass_mode = mass_mode;
        self.lookup = Arc::new(ChemistryTables::new(mass_mode));
    }

    pub fn set_lookup(&mut self, lookup: Arc<dyn ElementLookup + Send + Sync>) {
        self.lookup = lookup;
    }

    pub fn set_hydrogen_policy(&mut self, policy: Arc<dyn HydrogenPolicy>) {
        self.hydrogen_policy = policy;
    }

    pub fn set_reporter(&mut self, reporter: Arc<dyn EventReporter>) {
        self.reporter = reporter;
    }

    /// `callback` receives the percent complete while a search runs
    pub fn set_progress_callback(&mut self, callback: Option<ProgressCallback>) {
        self.progress_callback = callback;
    }

    ////////////////////////////////////////CANDIDATES////////////////////////////////////////

    /// Adds a candidate with default tolerances (0 %, counts 0..10).
    /// Re-adding a key replaces its tolerance.
    pub fn add_candidate_element(&mut self, key: &str) {
        self.add_candidate_with_tolerance(key, CandidateTolerance::default());
    }

    /// candidate for the percent composition search
    pub fn add_candidate_with_percent(&mut self, key: &str, target_percent: f64) {
        self.add_candidate_with_tolerance(key, CandidateTolerance::with_percent(target_percent));
    }

    /// candidate for the bounded search
    pub fn add_candidate_with_counts(&mut self, key: &str, min_count: u32, max_count: u32) {
        self.add_candidate_with_tolerance(key, CandidateTolerance::with_counts(min_count, max_count));
    }

    pub fn add_candidate_with_tolerance(&mut self, key: &str, tolerance: CandidateTolerance) {
        let clamped = self.clamp_tolerance(key, tolerance);
        self.candidates.insert(key.to_string(), clamped);
    }

    /// removes a candidate, returns false when the key was not present
    pub fn remove_candidate_element(&mut self, key: &str) -> bool {
        self.candidates.remove(key).is_some()
    }

    pub fn candidate_elements(&self) -> &BTreeMap<String, CandidateTolerance> {
        &self.candidates
    }

    /// Replaces all candidates. Count ranges are clamped to [0, 65565] and percents to [0, 100].
    pub fn set_candidate_elements(&mut self, candidates: BTreeMap<String, CandidateTolerance>) {
        let clamped: BTreeMap<String, CandidateTolerance> = candidates
            .into_iter()
            .map(|(key, tolerance)| {
                let tolerance = self.clamp_tolerance(&key, tolerance);
                (key, tolerance)
            })
            .collect();
        self.candidates = clamped;
    }

    fn clamp_tolerance(&self, key: &str, tolerance: CandidateTolerance) -> CandidateTolerance {
        let clamped = tolerance.clamped();
        if clamped != tolerance {
            self.reporter.warning(&format!(
                "tolerance of candidate '{}' clamped to {:?}",
                key, clamped
            ));
        }
        clamped
    }

    ////////////////////////////////////////SETTINGS////////////////////////////////////////

    pub fn maximum_hits(&self) -> usize {
        self.maximum_hits
    }

    /// number of results after which a search stops, clamped to [1, 1_000_000]
    pub fn set_maximum_hits(&mut self, maximum_hits: usize) {
        let clamped = maximum_hits.clamp(1, MAXIMUM_ALLOWED_RESULTS_TO_FIND);
        if clamped != maximum_hits {
            self.reporter.warning(&format!(
                "maximum hits {} clamped to {}",
                maximum_hits, clamped
            ));
        }
        self.maximum_hits = clamped;
    }

    /// options used when a search is called without explicit options
    pub fn search_options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn set_search_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    /// Restores the default candidates (C 70 %, H 10 %, N 10 %, O 10 %), the default
    /// maximum hits and clears the abort flag.
    pub fn reset(&mut self) {
        self.candidates.clear();
        for (key, percent) in [("C", 70.0), ("H", 10.0), ("N", 10.0), ("O", 10.0)] {
            self.candidates
                .insert(key.to_string(), CandidateTolerance::with_percent(percent));
        }
        self.maximum_hits = DEFAULT_MAXIMUM_HITS;
        self.abort.reset();
        self.progress.reset();
    }

    ////////////////////////////////////////CONTROL////////////////////////////////////////

    /// Handle that stops a running search from another thread. Results found so far are returned.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// asks the running search (or, if none runs, the next one) to stop
    pub fn abort_processing_now(&self) {
        self.abort.abort();
    }

    pub fn progress_tracker(&self) -> ProgressTracker {
        self.progress.clone()
    }

    /// percent complete of the current or last search
    pub fn percent_complete(&self) -> f64 {
        self.progress.get()
    }

    fn control(&self) -> SearchControl {
        SearchControl {
            abort: self.abort.clone(),
            progress: self.progress.clone(),
            callback: self.progress_callback.clone(),
            maximum_hits: self.maximum_hits,
        }
    }

    ////////////////////////////////////////SEARCH////////////////////////////////////////

    /// Formulas whose mass lies within `tolerance` Da of `target_mass`.
    /// Configuration errors are reported and give an empty list.
    ///
    /// # Arguments
    /// * `target_mass` - target mass, Da (target m/z if the options ask for it)
    /// * `tolerance` - half width of the window, Da
    /// * `options` - search options, `None` uses the finder's own options
    pub fn find_matches_by_mass(
        &self,
        target_mass: f64,
        tolerance: f64,
        options: Option<&SearchOptions>,
    ) -> Vec<SearchResult> {
        let outcome = self.try_find_matches_by_mass(target_mass, tolerance, options);
        self.report_failure(outcome)
    }

    /// as `find_matches_by_mass` with the tolerance in ppm of the target
    pub fn find_matches_by_mass_ppm(
        &self,
        target_mass: f64,
        tolerance_ppm: f64,
        options: Option<&SearchOptions>,
    ) -> Vec<SearchResult> {
        let outcome = self.try_find_matches_by_mass_ppm(target_mass, tolerance_ppm, options);
        self.report_failure(outcome)
    }

    /// Formulas not heavier than `maximum_formula_mass` whose percent composition is within
    /// `percent_tolerance` of the candidates' target percents.
    pub fn find_matches_by_percent_composition(
        &self,
        maximum_formula_mass: f64,
        percent_tolerance: f64,
        options: Option<&SearchOptions>,
    ) -> Vec<SearchResult> {
        let outcome =
            self.try_find_matches_by_percent_composition(maximum_formula_mass, percent_tolerance, options);
        self.report_failure(outcome)
    }

    pub fn try_find_matches_by_mass(
        &self,
        target_mass: f64,
        tolerance: f64,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<SearchResult>, FinderError> {
        let outcome = self.mass_search(target_mass, tolerance, false, options);
        self.abort.reset();
        outcome
    }

    pub fn try_find_matches_by_mass_ppm(
        &self,
        target_mass: f64,
        tolerance_ppm: f64,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<SearchResult>, FinderError> {
        let outcome = if tolerance_ppm.is_finite() && tolerance_ppm >= 0.0 {
            self.mass_search(target_mass, target_mass * tolerance_ppm / 1e6, true, options)
        } else {
            Err(FinderError::InvalidSearchConfiguration(format!(
                "tolerance must be a non-negative number, got {} ppm",
                tolerance_ppm
            )))
        };
        self.abort.reset();
        outcome
    }

    pub fn try_find_matches_by_percent_composition(
        &self,
        maximum_formula_mass: f64,
        percent_tolerance: f64,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<SearchResult>, FinderError> {
        let outcome = self.percent_search(maximum_formula_mass, percent_tolerance, options);
        self.abort.reset();
        outcome
    }

    fn report_failure(&self, outcome: Result<Vec<SearchResult>, FinderError>) -> Vec<SearchResult> {
        match outcome {
            Ok(results) => results,
            Err(err) => {
                self.reporter.error(&err.to_string());
                Vec::new()
            }
        }
    }

    fn validate_window(&self, target: f64, tolerance: f64, target_name: &str) -> Result<(), FinderError> {
        if !(target.is_finite() && target > 0.0) {
            return Err(FinderError::InvalidSearchConfiguration(format!(
                "{} must be positive, got {}",
                target_name, target
            )));
        }
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(FinderError::InvalidSearchConfiguration(format!(
                "tolerance must be a non-negative number, got {}",
                tolerance
            )));
        }
        if self.candidates.is_empty() {
            return Err(FinderError::InvalidSearchConfiguration(
                "no candidate elements".to_string(),
            ));
        }
        Ok(())
    }

    fn mass_search(
        &self,
        target_mass: f64,
        tolerance: f64,
        ppm: bool,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<SearchResult>, FinderError> {
        let options = options.unwrap_or(&self.options);
        self.validate_window(target_mass, tolerance, "target mass")?;
        let candidates = resolve_candidates(&self.candidates, self.lookup.as_ref(), 0.0)?;
        let algorithm = SearchAlgorithm::from(options.search_mode());

        let targets: Vec<MassTarget> = if options.find_target_mz() {
            options
                .mz_charge_multiples()
                .map(|z| MassTarget::for_charge_multiple(target_mass, tolerance, z, ppm))
                .collect()
        } else {
            vec![MassTarget::new(target_mass, tolerance, ppm)]
        };
        info!(
            "mass search: target {} +/- {} Da, {} candidates, {:?}, {} pass(es)",
            target_mass,
            tolerance,
            candidates.len(),
            options.search_mode(),
            targets.len()
        );

        let control = self.control();
        control.report_progress(0.0);
        let mut ctx = SearchContext::new(
            &candidates,
            options,
            self.hydrogen_policy.as_ref(),
            &control,
            self.reporter.as_ref(),
        );
        let mut outcome = Ok(());
        for (pass, target) in targets.iter().enumerate() {
            let estimate = estimate_operation_count(&algorithm, &candidates, target.upper());
            debug!("pass {}: window {}..{}, estimate {}", pass, target.lower(), target.upper(), estimate);
            ctx.begin_pass(pass, targets.len(), estimate);
            outcome = algorithm.search_mass(&mut ctx, target);
            if outcome.is_err() || ctx.is_full() {
                break;
            }
        }
        self.finish(&control, ctx.into_results(), outcome)
    }

    fn percent_search(
        &self,
        maximum_formula_mass: f64,
        percent_tolerance: f64,
        options: Option<&SearchOptions>,
    ) -> Result<Vec<SearchResult>, FinderError> {
        let options = options.unwrap_or(&self.options);
        self.validate_window(maximum_formula_mass, percent_tolerance, "maximum formula mass")?;
        let percent_sum: f64 = self.candidates.values().map(|t| t.target_percent).sum();
        if (percent_sum - 100.0).abs() > PERCENT_SUM_EPSILON {
            return Err(FinderError::InvalidSearchConfiguration(format!(
                "target percents sum to {}, not 100",
                percent_sum
            )));
        }
        let candidates = resolve_candidates(&self.candidates, self.lookup.as_ref(), percent_tolerance)?;
        let algorithm = SearchAlgorithm::from(options.search_mode());
        info!(
            "percent composition search: up to {} Da, +/- {} %, {} candidates, {:?}",
            maximum_formula_mass,
            percent_tolerance,
            candidates.len(),
            options.search_mode()
        );

        let control = self.control();
        control.report_progress(0.0);
        let mut ctx = SearchContext::new(
            &candidates,
            options,
            self.hydrogen_policy.as_ref(),
            &control,
            self.reporter.as_ref(),
        );
        let estimate = estimate_operation_count(&algorithm, &candidates, maximum_formula_mass);
        ctx.begin_pass(0, 1, estimate);
        let outcome = algorithm.search_percent(&mut ctx, maximum_formula_mass);
        self.finish(&control, ctx.into_results(), outcome)
    }

    /// Aborted searches keep what they found; the list is sorted by formula in any case.
    fn finish(
        &self,
        control: &SearchControl,
        mut results: Vec<SearchResult>,
        outcome: Result<(), FinderError>,
    ) -> Result<Vec<SearchResult>, FinderError> {
        match outcome {
            Ok(()) => {}
            Err(FinderError::Aborted) => {
                self.reporter
                    .message(&format!("search aborted, keeping {} result(s)", results.len()));
            }
            Err(err) => return Err(err),
        }
        sort_results(&mut results);
        control.report_progress(100.0);
        info!("{} formula(s) found", results.len());
        Ok(results)
    }
}
