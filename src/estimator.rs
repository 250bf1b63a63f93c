// estimator.rs - Finalized correlation curve and correlation-length estimates

use num_traits::Float;

use crate::inner_product::to_scalar;
use crate::report::ReportRow;

/// The averaged correlation function C(j), j in `0..=bound`.
///
/// Produced once by `CorrelationAccumulator::finalize`; read-only afterwards.
#[derive(Debug, Clone)]
pub struct CorrelationCurve<T> {
    c: Vec<T>,
    c_rms: Option<Vec<T>>,
    n_samples: Vec<usize>,
    persistence_threshold: T,
}

impl<T: Float> CorrelationCurve<T> {
    pub fn new(c: Vec<T>, c_rms: Option<Vec<T>>, n_samples: Vec<usize>, persistence_threshold: T) -> Self {
        debug_assert_eq!(c.len(), n_samples.len());
        debug_assert!(c_rms.as_ref().map_or(true, |r| r.len() == c.len()));
        Self { c, c_rms, n_samples, persistence_threshold }
    }

    /// Inclusive upper lag, `None` when no data was accumulated.
    pub fn bound(&self) -> Option<usize> {
        self.c.len().checked_sub(1)
    }

    pub fn values(&self) -> &[T] {
        &self.c
    }

    pub fn rms(&self) -> Option<&[T]> {
        self.c_rms.as_deref()
    }

    pub fn counts(&self) -> &[usize] {
        &self.n_samples
    }

    pub fn persistence_threshold(&self) -> T {
        self.persistence_threshold
    }

    /// C(j) / C(0). Empty when C(0) is zero.
    pub fn normalized(&self) -> Vec<T> {
        match self.c.first() {
            Some(&c0) if c0 != T::zero() => self.c.iter().map(|&c| c / c0).collect(),
            _ => Vec::new(),
        }
    }

    /// Lags with at least one contributing pair, in increasing order.
    pub fn rows(&self) -> impl Iterator<Item = ReportRow<T>> + '_ {
        self.c
            .iter()
            .zip(&self.n_samples)
            .enumerate()
            .filter(|(_, (_, n))| **n > 0)
            .map(move |(lag, (&c, &n_samples))| ReportRow {
                lag,
                c,
                c_rms: self.c_rms.as_ref().map(|r| r[lag]),
                n_samples,
            })
    }

    /// Sum of C(j) from j = 0 while C(j) stays above the persistence
    /// threshold (and has samples). Noisy for long tails.
    pub fn integrate(&self) -> T {
        let c0 = match self.c.first() {
            Some(&c0) => c0,
            None => return T::zero(),
        };
        let limit = self.persistence_threshold * c0;
        self.c
            .iter()
            .zip(&self.n_samples)
            .take_while(|(c, n)| **n > 0 && **c > limit)
            .fold(T::zero(), |total, (&c, _)| total + c)
    }

    /// Fractional lag at which C(j) first drops below `thresh * C(0)`,
    /// interpolated linearly from the previous lag with samples.
    /// `None` if the curve never gets there.
    pub fn threshold_crossing(&self, thresh: T) -> Option<T> {
        let (&c0, &n0) = self.c.first().zip(self.n_samples.first())?;
        if n0 == 0 {
            return None;
        }
        let limit = thresh * c0;
        let mut prev = 0usize;
        for (j, (&c, &n)) in self.c.iter().zip(&self.n_samples).enumerate().skip(1) {
            if n == 0 {
                continue;
            }
            if c < limit {
                let before = self.c[prev];
                let frac = if before != c { (before - limit) / (before - c) } else { T::zero() };
                let (j0, j1): (T, T) = (to_scalar(prev), to_scalar(j));
                return Some(j0 + frac * (j1 - j0));
            }
            prev = j;
        }
        None
    }

    /// Integrated correlation length, ∫C / C(0).
    pub fn correlation_length(&self) -> T {
        match self.c.first() {
            Some(&c0) if c0 != T::zero() => self.integrate() / c0,
            _ => T::zero(),
        }
    }

    /// Exponential-decay estimate of the correlation length.
    ///
    /// With C(j) ≈ C(0)·exp(-j/ξ) and a crossing at j* of the persistence
    /// threshold p: ξ = -j* / ln p. Falls back to the integrated length when
    /// no crossing exists or p is outside (0, 1).
    pub fn guess_correlation_length(&self) -> T {
        let p = self.persistence_threshold;
        if p > T::zero() && p < T::one() {
            if let Some(j) = self.threshold_crossing(p) {
                return -j / p.ln();
            }
        }
        self.correlation_length()
    }
}
