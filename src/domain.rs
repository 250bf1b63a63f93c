// domain.rs - Choosing the lag domain and growing the per-lag running totals

use num_traits::Float;
use tracing::debug;

/// Running sums for a single lag `j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagTotals<T> {
    /// Σ x(i)·x(i+j)
    pub sum: T,
    /// Σ (x(i)·x(i+j))², only filled when rms reporting is on.
    pub sum_sq: T,
    /// Number of pairs contributing to `sum`.
    pub count: usize,
}

impl<T: Float> LagTotals<T> {
    pub fn zero() -> Self {
        Self { sum: T::zero(), sum_sq: T::zero(), count: 0 }
    }
}

/// Decides how many lags each data set contributes to.
///
/// The committed bound only grows (to fit longer data sets) until the first
/// threshold truncation; after that it can only shrink.
#[derive(Debug, Clone)]
pub struct DomainSelector {
    requested: usize,
    periodic: bool,
    committed: Option<usize>,
    truncated: bool,
}

impl DomainSelector {
    /// `requested == 0` lets the data pick the domain.
    pub fn new(requested: usize, periodic: bool) -> Self {
        Self {
            requested,
            periodic,
            committed: (requested > 0).then_some(requested),
            truncated: false,
        }
    }

    /// Inclusive upper lag bound, `None` until something fixed it.
    pub fn bound(&self) -> Option<usize> {
        self.committed
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Resolve the domain bound once a data set of `n` samples arrives.
    pub fn select(&mut self, n: usize) -> usize {
        let proposed = if self.periodic {
            if self.requested == 0 || self.requested > n / 2 {
                n / 2
            } else {
                self.requested
            }
        } else if self.requested == 0 {
            n / 2
        } else {
            self.requested.min(n.saturating_sub(1))
        };

        let resolved = match self.committed {
            Some(prev) if self.truncated => prev,
            Some(prev) => proposed.max(prev),
            None => proposed,
        };
        if self.committed.map_or(true, |prev| resolved > prev) {
            debug!(n, bound = resolved, "domain grown");
        }
        self.committed = Some(resolved);
        resolved
    }

    /// Highest lag a data set of `n` samples can contribute to under `bound`.
    /// Periodic data wraps around, so it reaches every lag.
    pub fn reach(&self, n: usize, bound: usize) -> usize {
        if self.periodic {
            bound
        } else {
            bound.min(n.saturating_sub(1))
        }
    }

    /// Lower the bound to `lag` for the rest of the run.
    pub fn truncate(&mut self, lag: usize) {
        let bound = self.committed.map_or(lag, |prev| prev.min(lag));
        self.committed = Some(bound);
        self.truncated = true;
    }
}

/// Per-lag running totals, always sized to `bound + 1` entries.
#[derive(Debug, Clone)]
pub struct CurveStorage<T> {
    lags: Vec<LagTotals<T>>,
}

impl<T: Float> CurveStorage<T> {
    pub fn new() -> Self {
        Self { lags: Vec::new() }
    }

    pub fn with_bound(bound: usize) -> Self {
        Self { lags: vec![LagTotals::zero(); bound + 1] }
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    /// Append zeroed lags until `bound` is addressable. Never shrinks.
    pub fn grow_to(&mut self, bound: usize) {
        if bound + 1 > self.lags.len() {
            self.lags.resize(bound + 1, LagTotals::zero());
        }
    }

    /// Drop every lag above `bound`.
    pub fn truncate_to(&mut self, bound: usize) {
        self.lags.truncate(bound + 1);
    }

    pub fn lags(&self) -> &[LagTotals<T>] {
        &self.lags
    }

    pub(crate) fn lags_mut(&mut self) -> &mut [LagTotals<T>] {
        &mut self.lags
    }

    pub(crate) fn into_lags(self) -> Vec<LagTotals<T>> {
        self.lags
    }
}

impl<T: Float> Default for CurveStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
