//! Cooperative cancellation, progress reporting and the operation count estimate
//! the progress percentage is based on.
use crate::FormulaFinder::errors::FinderError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared abort flag. Clones refer to the same flag, so a handle can be moved to another
/// thread and used to stop a running search.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Shared percent complete (0..=100) of the running search
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker(Arc<AtomicU64>);

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set(&self, percent: f64) {
        self.0
            .store(percent.clamp(0.0, 100.0).to_bits(), Ordering::Relaxed);
    }
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
    pub fn reset(&self) {
        self.set(0.0);
    }
}

pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// everything a single search polls or updates while it runs
#[derive(Clone)]
pub struct SearchControl {
    pub abort: AbortHandle,
    pub progress: ProgressTracker,
    pub callback: Option<ProgressCallback>,
    pub maximum_hits: usize,
}

impl SearchControl {
    pub fn new(maximum_hits: usize) -> Self {
        Self {
            abort: AbortHandle::new(),
            progress: ProgressTracker::new(),
            callback: None,
            maximum_hits,
        }
    }

    pub fn report_progress(&self, percent: f64) {
        self.progress.set(percent);
        if let Some(callback) = &self.callback {
            callback(self.progress.get());
        }
    }
}

impl std::fmt::Debug for SearchControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchControl")
            .field("abort", &self.abort)
            .field("progress", &self.progress)
            .field("callback", &self.callback.is_some())
            .field("maximum_hits", &self.maximum_hits)
            .finish()
    }
}

/// binomial coefficient n over k
pub fn binomial(n: u64, k: u64) -> Result<u64, FinderError> {
    if k > n {
        return Ok(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // exact at every step: the product of i+1 consecutive integers is divisible by (i+1)!
        result = result
            .checked_mul((n - i) as u128)
            .ok_or(FinderError::NumericOverflow)?
            / (i + 1) as u128;
        if result > u64::MAX as u128 {
            return Err(FinderError::NumericOverflow);
        }
    }
    Ok(result as u64)
}

/// number of multisets of at most `max_units` units drawn from `kinds` candidates
pub fn thorough_operation_count(kinds: usize, max_units: u64) -> Result<u64, FinderError> {
    if kinds == 0 {
        return Ok(0);
    }
    let n = (kinds as u64)
        .checked_add(max_units)
        .ok_or(FinderError::NumericOverflow)?;
    binomial(n, max_units)
}

/// product of the count range sizes
pub fn bounded_operation_count(ranges: &[(u32, u32)]) -> Result<u64, FinderError> {
    ranges.iter().try_fold(1u64, |acc, &(min, max)| {
        let size = u64::from(max.saturating_sub(min)) + 1;
        acc.checked_mul(size).ok_or(FinderError::NumericOverflow)
    })
}
