//! Depth-first enumeration of multisets of candidates.
//!
//! Candidates are sorted heaviest first and level `d` of the recursion chooses the count of
//! candidate `d`, so the depth never exceeds the number of candidates and every multiset is
//! visited exactly once. A level only tries counts that keep the running mass below the
//! ceiling. The last (lightest) candidate jumps straight to the counts that land in the
//! target window instead of stepping through every unit below it.
use crate::FormulaFinder::candidate::CandidateElement;
use crate::FormulaFinder::control::thorough_operation_count;
use crate::FormulaFinder::engine::{Acceptance, SearchContext, SearchEngine};
use crate::FormulaFinder::errors::FinderError;
use crate::FormulaFinder::verifier::MassTarget;

#[derive(Debug, Clone, Copy, Default)]
pub struct ThoroughSearch;

/// whole units of `unit_mass` that fit in `room`, saturating
fn units_below(room: f64, unit_mass: f64) -> Option<u32> {
    if room < 0.0 || !(unit_mass > 0.0) {
        return None;
    }
    Some((room / unit_mass).floor().min(u32::MAX as f64) as u32)
}

impl ThoroughSearch {
    /// Counts of a candidate of `unit_mass` worth trying on top of `mass`. `None` when not even
    /// the smallest count fits under the ceiling.
    fn count_range(
        acceptance: Acceptance<'_>,
        is_last: bool,
        unit_mass: f64,
        mass: f64,
    ) -> Option<(u32, u32)> {
        let most = units_below(acceptance.ceiling() - mass, unit_mass)?;
        let (first, last) = match acceptance {
            // one unit of slack on both ends, the window itself is checked on acceptance
            Acceptance::Mass(target) if is_last => {
                let below = ((target.lower() - mass) / unit_mass).ceil() - 1.0;
                let first = below.max(0.0).min(u32::MAX as f64) as u32;
                (first, most.saturating_add(1))
            }
            Acceptance::Mass(_) => (0, most),
            // every candidate has to be present
            Acceptance::Percent { .. } => (1, most),
        };
        (first <= last).then_some((first, last))
    }

    fn recurse(
        &self,
        ctx: &mut SearchContext<'_>,
        acceptance: Acceptance<'_>,
        index: usize,
        counts: &mut [u32],
        mass: f64,
        charge: f64,
    ) -> Result<(), FinderError> {
        let candidates = ctx.candidates;
        if index == candidates.len() {
            if counts.iter().any(|&n| n > 0) {
                ctx.try_accept(acceptance, counts, mass, charge);
            }
            return Ok(());
        }
        let candidate = &candidates[index];
        let is_last = index + 1 == candidates.len();
        let Some((first, last)) = Self::count_range(acceptance, is_last, candidate.mass, mass) else {
            return Ok(());
        };
        let ceiling = acceptance.ceiling();
        let mut outcome = Ok(());
        for count in first..=last {
            if let Err(err) = ctx.checkpoint() {
                outcome = Err(err);
                break;
            }
            if ctx.is_full() {
                break;
            }
            let new_mass = mass + count as f64 * candidate.mass;
            if new_mass > ceiling {
                break;
            }
            counts[index] = count;
            outcome = self.recurse(
                ctx,
                acceptance,
                index + 1,
                counts,
                new_mass,
                charge + count as f64 * candidate.charge,
            );
            if outcome.is_err() {
                break;
            }
        }
        counts[index] = 0;
        outcome
    }

    fn run(&self, ctx: &mut SearchContext<'_>, acceptance: Acceptance<'_>) -> Result<(), FinderError> {
        if ctx.candidates.is_empty() {
            return Ok(());
        }
        let mut counts = vec![0u32; ctx.candidates.len()];
        self.recurse(ctx, acceptance, 0, &mut counts, 0.0, 0.0)
    }
}

impl SearchEngine for ThoroughSearch {
    fn search_mass(&self, ctx: &mut SearchContext<'_>, target: &MassTarget) -> Result<(), FinderError> {
        self.run(ctx, Acceptance::Mass(target))
    }

    fn search_percent(&self, ctx: &mut SearchContext<'_>, max_mass: f64) -> Result<(), FinderError> {
        self.run(ctx, Acceptance::Percent { max_mass })
    }

    /// multisets of at most ceiling/lightest mass units
    fn estimate_operations(&self, candidates: &[CandidateElement], ceiling: f64) -> Result<u64, FinderError> {
        let lightest = candidates
            .iter()
            .map(|c| c.mass)
            .fold(f64::INFINITY, f64::min);
        if candidates.is_empty() || !(lightest > 0.0) || !ceiling.is_finite() {
            return Err(FinderError::NumericOverflow);
        }
        let max_units = (ceiling / lightest).floor().max(0.0) as u64;
        thorough_operation_count(candidates.len(), max_units)
    }
}
