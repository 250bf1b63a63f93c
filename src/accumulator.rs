// accumulator.rs - Per-lag sums of inner products over independent data sets
//
// Data sets are consumed strictly one after the other. Within a data set the
// lags are summed in parallel: every lag owns its own `LagTotals` slot, and
// the only shared state is the truncation boundary, kept in an atomic.

use std::sync::atomic::{AtomicUsize, Ordering};

use num_traits::Float;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::config::AutocrrConfig;
use crate::domain::{CurveStorage, DomainSelector, LagTotals};
use crate::error::{AutocrrError, Result};
use crate::estimator::CorrelationCurve;
use crate::inner_product::{inner_product, to_scalar};

/// Receives per-lag progress while a data set is accumulated.
///
/// Called from worker threads, in no particular lag order.
pub trait LagObserver: Sync {
    fn lag_started(&self, lag: usize, reach: usize);
}

impl LagObserver for () {
    fn lag_started(&self, _lag: usize, _reach: usize) {}
}

/// Emits a `trace` event for every lag.
pub struct TraceObserver;

impl LagObserver for TraceObserver {
    fn lag_started(&self, lag: usize, reach: usize) {
        trace!(lag, reach, "processing separation");
    }
}

/// Running correlation sums for a whole run.
///
/// Feed every data set through [`accumulate_single`](Self::accumulate_single),
/// then call [`finalize`](Self::finalize), which consumes the accumulator.
pub struct CorrelationAccumulator<T> {
    config: AutocrrConfig,
    selector: DomainSelector,
    storage: CurveStorage<T>,
    truncation: Option<T>,
    persistence: T,
    n_data_sets: usize,
}

impl<T: Float + Send + Sync> CorrelationAccumulator<T> {
    pub fn new(config: AutocrrConfig) -> Result<Self> {
        config.validate()?;
        let selector = DomainSelector::new(config.domain, config.periodic);
        let storage = match selector.bound() {
            Some(bound) => CurveStorage::with_bound(bound),
            None => CurveStorage::new(),
        };
        let truncation = config
            .truncation_threshold()
            .map(|t| T::from(t).unwrap_or_else(T::zero));
        let persistence = T::from(config.persistence_threshold()).unwrap_or_else(T::zero);
        Ok(Self {
            config,
            selector,
            storage,
            truncation,
            persistence,
            n_data_sets: 0,
        })
    }

    pub fn config(&self) -> &AutocrrConfig {
        &self.config
    }

    /// Inclusive upper lag bound committed so far.
    pub fn bound(&self) -> Option<usize> {
        self.selector.bound()
    }

    /// Un-normalized running totals, one entry per lag in `0..=bound`.
    pub fn totals(&self) -> &[LagTotals<T>] {
        self.storage.lags()
    }

    /// Number of non-empty data sets accumulated so far.
    pub fn data_sets(&self) -> usize {
        self.n_data_sets
    }

    /// Accumulate several data sets in order.
    pub fn accumulate<I, S>(&mut self, data_sets: I) -> Result<Option<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Vec<T>]>,
    {
        for data in data_sets {
            self.accumulate_single(data.as_ref())?;
        }
        Ok(self.bound())
    }

    pub fn accumulate_single(&mut self, samples: &[Vec<T>]) -> Result<Option<usize>> {
        self.accumulate_single_observed(samples, &())
    }

    /// Add one data set to the running sums and return the (possibly reduced)
    /// domain bound.
    pub fn accumulate_single_observed(
        &mut self,
        samples: &[Vec<T>],
        observer: &dyn LagObserver,
    ) -> Result<Option<usize>> {
        let n = samples.len();
        if n == 0 {
            return Ok(self.bound());
        }
        if self.n_data_sets > 0 && self.config.explicit_threshold() {
            return Err(AutocrrError::Configuration(
                "ERROR: Do not use -threshold when analyzing files containing multiple data\n       \
                 sets separated by blank lines (sometimes also called \"trajectories\").\n       \
                 Use the -L argument instead."
                    .to_string(),
            ));
        }
        let data_set = self.n_data_sets + 1;

        let dim = samples[0].len();
        if let Some((row, bad)) = samples.iter().enumerate().find(|(_, s)| s.len() != dim) {
            return Err(AutocrrError::DimensionMismatch {
                data_set,
                row: row + 1,
                expected: dim,
                found: bad.len(),
            });
        }

        // Local copy, centered if requested.
        let mut x = samples.to_vec();
        if self.config.subtract_ave {
            subtract_average(&mut x, dim);
        }

        let bound = self.selector.select(n);
        self.storage.grow_to(bound);
        let reach = self.selector.reach(n, bound);
        let periodic = self.config.periodic;
        let track_sq = self.config.report_rms;
        debug!(data_set, n, dim, bound, reach, "accumulating data set");

        // Lag 0 first: every other lag is compared against it.
        let lags = self.storage.lags_mut();
        observer.lag_started(0, reach);
        add_lag(&mut lags[0], &x, 0, periodic, track_sq);
        let zero = lags[0];

        let first_violation = AtomicUsize::new(usize::MAX);
        let cutoff = self.truncation;
        lags[1..=reach]
            .par_iter_mut()
            .enumerate()
            .for_each(|(k, slot)| {
                let j = k + 1;
                if j > first_violation.load(Ordering::Acquire) {
                    return;
                }
                observer.lag_started(j, reach);
                add_lag(slot, &x, j, periodic, track_sq);
                if let Some(t) = cutoff {
                    if below_threshold(slot, &zero, t) {
                        first_violation.fetch_min(j, Ordering::AcqRel);
                    }
                }
            });

        let violation = first_violation.into_inner();
        if violation <= reach {
            // Lags above the first violation may have been summed by other
            // workers; they are discarded together with the rest of the tail.
            self.selector.truncate(violation);
            self.storage.truncate_to(violation);
            info!(data_set, lag = violation, "correlation fell below threshold, domain truncated");
        }

        self.n_data_sets = data_set;
        Ok(self.bound())
    }

    /// Normalize the sums into the averaged correlation curve.
    pub fn finalize(self) -> CorrelationCurve<T> {
        let track_sq = self.config.report_rms;
        let lags = self.storage.into_lags();
        let mut c = Vec::with_capacity(lags.len());
        let mut c_rms = Vec::with_capacity(if track_sq { lags.len() } else { 0 });
        let mut n_samples = Vec::with_capacity(lags.len());

        for totals in &lags {
            let (mean, rms) = normalize(totals);
            c.push(mean);
            if track_sq {
                c_rms.push(rms);
            }
            n_samples.push(totals.count);
        }

        CorrelationCurve::new(c, track_sq.then_some(c_rms), n_samples, self.persistence)
    }
}

/// Mean and standard deviation of the per-pair inner product at one lag.
/// Lags without pairs normalize to zero.
pub fn normalize<T: Float>(totals: &LagTotals<T>) -> (T, T) {
    if totals.count == 0 {
        return (T::zero(), T::zero());
    }
    let n: T = to_scalar(totals.count);
    let mean = totals.sum / n;
    let var = totals.sum_sq / n - mean * mean;
    (mean, var.max(T::zero()).sqrt())
}

/// Running sum at lag `j` compared with `threshold` times the running sum at
/// lag 0. Neither side is normalized by its pair count.
fn below_threshold<T: Float>(lag: &LagTotals<T>, zero: &LagTotals<T>, threshold: T) -> bool {
    lag.count > 0 && lag.sum < threshold * zero.sum
}

fn add_lag<T: Float>(slot: &mut LagTotals<T>, x: &[Vec<T>], j: usize, periodic: bool, track_sq: bool) {
    let n = x.len();
    let pairs = if periodic { n } else { n.saturating_sub(j) };
    let (mut sum, mut sum_sq) = (T::zero(), T::zero());
    for i in 0..pairs {
        let partner = if periodic { (i + j) % n } else { i + j };
        let c = inner_product(&x[i], &x[partner]);
        sum = sum + c;
        if track_sq {
            sum_sq = sum_sq + c * c;
        }
    }
    slot.sum = slot.sum + sum;
    slot.sum_sq = slot.sum_sq + sum_sq;
    slot.count += pairs;
}

fn subtract_average<T: Float>(x: &mut [Vec<T>], dim: usize) {
    let mut ave = vec![T::zero(); dim];
    for sample in x.iter() {
        for (a, &v) in ave.iter_mut().zip(sample) {
            *a = *a + v;
        }
    }
    let n: T = to_scalar(x.len());
    for a in ave.iter_mut() {
        *a = *a / n;
    }
    for sample in x.iter_mut() {
        for (v, &a) in sample.iter_mut().zip(&ave) {
            *v = *v - a;
        }
    }
}
