//! Odometer over the explicit [min, max] count range of every candidate.
//! Digit `d` is the count of candidate `d`; before a digit is advanced the partial mass plus the
//! minimum mass of all later digits is compared with the ceiling, and the rest of the digit's
//! range is skipped once it is exceeded.
use crate::FormulaFinder::candidate::CandidateElement;
use crate::FormulaFinder::control::bounded_operation_count;
use crate::FormulaFinder::engine::{Acceptance, SearchContext, SearchEngine};
use crate::FormulaFinder::errors::FinderError;
use crate::FormulaFinder::verifier::MassTarget;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedSearch;

/// suffix[d] = mass of the minimum counts of candidates d.., suffix[len] = 0
fn minimum_suffix_masses(candidates: &[CandidateElement]) -> Vec<f64> {
    let mut suffix = vec![0.0; candidates.len() + 1];
    for (d, candidate) in candidates.iter().enumerate().rev() {
        suffix[d] = suffix[d + 1] + candidate.count_minimum as f64 * candidate.mass;
    }
    suffix
}

impl BoundedSearch {
    #[allow(clippy::too_many_arguments)]
    fn descend(
        &self,
        ctx: &mut SearchContext<'_>,
        acceptance: Acceptance<'_>,
        suffix: &[f64],
        depth: usize,
        counts: &mut [u32],
        mass: f64,
        charge: f64,
    ) -> Result<(), FinderError> {
        let candidates = ctx.candidates;
        if depth == candidates.len() {
            ctx.checkpoint()?;
            // the all-zero vector is not a formula
            if counts.iter().any(|&n| n > 0) {
                ctx.try_accept(acceptance, counts, mass, charge);
            }
            return Ok(());
        }
        let candidate = &candidates[depth];
        let ceiling = acceptance.ceiling();
        for count in candidate.count_minimum..=candidate.count_maximum {
            if ctx.is_full() {
                break;
            }
            let partial = mass + count as f64 * candidate.mass;
            if partial + suffix[depth + 1] > ceiling {
                break;
            }
            counts[depth] = count;
            self.descend(
                ctx,
                acceptance,
                suffix,
                depth + 1,
                counts,
                partial,
                charge + count as f64 * candidate.charge,
            )?;
        }
        counts[depth] = candidate.count_minimum;
        Ok(())
    }

    fn run(&self, ctx: &mut SearchContext<'_>, acceptance: Acceptance<'_>) -> Result<(), FinderError> {
        if ctx.candidates.is_empty() {
            return Ok(());
        }
        let suffix = minimum_suffix_masses(ctx.candidates);
        let mut counts: Vec<u32> = ctx.candidates.iter().map(|c| c.count_minimum).collect();
        self.descend(ctx, acceptance, &suffix, 0, &mut counts, 0.0, 0.0)
    }
}

impl SearchEngine for BoundedSearch {
    fn search_mass(&self, ctx: &mut SearchContext<'_>, target: &MassTarget) -> Result<(), FinderError> {
        self.run(ctx, Acceptance::Mass(target))
    }

    fn search_percent(&self, ctx: &mut SearchContext<'_>, max_mass: f64) -> Result<(), FinderError> {
        self.run(ctx, Acceptance::Percent { max_mass })
    }

    fn estimate_operations(&self, candidates: &[CandidateElement], _ceiling: f64) -> Result<u64, FinderError> {
        let ranges: Vec<(u32, u32)> = candidates
            .iter()
            .map(|c| (c.count_minimum, c.count_maximum))
            .collect();
        bounded_operation_count(&ranges)
    }
}
