use crate::FormulaFinder::bounded_search::BoundedSearch;
use crate::FormulaFinder::candidate::CandidateElement;
use crate::FormulaFinder::control::SearchControl;
use crate::FormulaFinder::errors::FinderError;
use crate::FormulaFinder::options::{SearchMode, SearchOptions};
use crate::FormulaFinder::reporter::EventReporter;
use crate::FormulaFinder::results::SearchResult;
use crate::FormulaFinder::thorough_search::ThoroughSearch;
use crate::FormulaFinder::verifier::{
    CompoundVerifier, HydrogenPolicy, MassTarget, percent_composition_matches,
};
use enum_dispatch::enum_dispatch;
use log::debug;
use std::collections::HashSet;

/// progress is published once per this many visited nodes
const PROGRESS_INTERVAL: u64 = 1024;

/// What makes a count vector a hit
#[derive(Debug, Clone, Copy)]
pub enum Acceptance<'t> {
    /// total mass inside the target window
    Mass(&'t MassTarget),
    /// every candidate present and inside its percent band, total mass not above `max_mass`
    Percent { max_mass: f64 },
}

impl Acceptance<'_> {
    /// no branch heavier than this can produce a hit
    pub fn ceiling(&self) -> f64 {
        match self {
            Acceptance::Mass(target) => target.upper(),
            Acceptance::Percent { max_mass } => *max_mass,
        }
    }
}

#[enum_dispatch]
pub trait SearchEngine {
    /// enumerates compositions for one mass window, hits go to `ctx`
    fn search_mass(&self, ctx: &mut SearchContext<'_>, target: &MassTarget) -> Result<(), FinderError>;
    /// enumerates compositions up to `max_mass` matching the percent bands
    fn search_percent(&self, ctx: &mut SearchContext<'_>, max_mass: f64) -> Result<(), FinderError>;
    /// number of nodes the enumeration is expected to visit below `ceiling`
    fn estimate_operations(&self, candidates: &[CandidateElement], ceiling: f64) -> Result<u64, FinderError>;
}

#[derive(Debug, Clone, Copy)]
#[enum_dispatch(SearchEngine)]
pub enum SearchAlgorithm {
    ThoroughSearch(ThoroughSearch),
    BoundedSearch(BoundedSearch),
}

impl From<SearchMode> for SearchAlgorithm {
    fn from(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Thorough => SearchAlgorithm::ThoroughSearch(ThoroughSearch),
            SearchMode::Bounded => SearchAlgorithm::BoundedSearch(BoundedSearch),
        }
    }
}

/// Advisory operation count for progress reporting. Saturates at `u64::MAX` when the
/// count is not representable.
pub fn estimate_operation_count(
    algorithm: &SearchAlgorithm,
    candidates: &[CandidateElement],
    ceiling: f64,
) -> u64 {
    match algorithm.estimate_operations(candidates, ceiling) {
        Ok(count) => count,
        Err(err) => {
            debug!("operation count estimate clamped: {}", err);
            u64::MAX
        }
    }
}

/// State of one search call: the hits found so far, the visited node counter and
/// the abort/progress control.
pub struct SearchContext<'a> {
    pub candidates: &'a [CandidateElement],
    verifier: CompoundVerifier<'a>,
    control: &'a SearchControl,
    reporter: &'a dyn EventReporter,
    results: Vec<SearchResult>,
    seen: HashSet<String>,
    operations: u64,
    estimate: u64,
    pass: usize,
    passes: usize,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        candidates: &'a [CandidateElement],
        options: &'a SearchOptions,
        hydrogen_policy: &'a dyn HydrogenPolicy,
        control: &'a SearchControl,
        reporter: &'a dyn EventReporter,
    ) -> Self {
        Self {
            candidates,
            verifier: CompoundVerifier::new(options, hydrogen_policy, candidates),
            control,
            reporter,
            results: Vec::new(),
            seen: HashSet::new(),
            operations: 0,
            estimate: 0,
            pass: 0,
            passes: 1,
        }
    }

    /// starts pass `pass` of `passes` (one per charge multiple in target m/z mode)
    pub fn begin_pass(&mut self, pass: usize, passes: usize, estimate: u64) {
        self.pass = pass;
        self.passes = passes.max(1);
        self.estimate = estimate;
        self.operations = 0;
    }

    /// Counts a visited node, publishes progress now and then and fails with
    /// `Aborted` once the abort flag is raised.
    pub fn checkpoint(&mut self) -> Result<(), FinderError> {
        self.operations += 1;
        if self.operations % PROGRESS_INTERVAL == 0 {
            self.control.report_progress(self.progress());
        }
        if self.control.abort.is_aborted() {
            return Err(FinderError::Aborted);
        }
        Ok(())
    }

    fn progress(&self) -> f64 {
        let within_pass = if self.estimate == 0 {
            0.0
        } else {
            (self.operations as f64 / self.estimate as f64).min(1.0)
        };
        let percent = (self.pass as f64 + within_pass) / self.passes as f64 * 100.0;
        percent.min(99.9)
    }

    pub fn is_full(&self) -> bool {
        self.results.len() >= self.control.maximum_hits
    }

    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Verifies the composition and keeps it when it is a new hit. Infeasible compositions are
    /// dropped silently, unexpected verification failures go to the error reporter.
    pub fn try_accept(&mut self, acceptance: Acceptance<'_>, counts: &[u32], mass: f64, charge: f64) {
        if self.is_full() {
            return;
        }
        let target = match acceptance {
            Acceptance::Mass(target) => {
                if !target.contains(mass) {
                    return;
                }
                Some(target)
            }
            Acceptance::Percent { max_mass } => {
                if mass > max_mass || !percent_composition_matches(self.candidates, counts, mass) {
                    return;
                }
                None
            }
        };
        match self.verifier.verify(self.candidates, counts, mass, charge, target) {
            Ok(result) => {
                if self.seen.insert(result.empirical_formula.clone()) {
                    self.results.push(result);
                }
            }
            Err(FinderError::InfeasibleCompound(_)) => {}
            Err(err) => self.reporter.error(&err.to_string()),
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}
