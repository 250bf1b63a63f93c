// config.rs - Run configuration (single source of truth for one correlation run)

use crate::error::{AutocrrError, Result};

/// Fraction of C(0) used when the caller does not pick a threshold: 1/e.
pub const DEFAULT_THRESHOLD: f64 = 1.0 / std::f64::consts::E;

/// Options recognized by a correlation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocrrConfig {
    /// Fixed domain size `L` (lags `0..=L`); 0 selects the domain from the data.
    pub domain: usize,
    /// Wrap `i + j` around the end of each data set.
    pub periodic: bool,
    /// Subtract the per-dimension average of each data set before correlating.
    pub subtract_ave: bool,
    pub report_rms: bool,
    pub report_nsum: bool,
    /// Relative cutoff in `[-1, 1]`, as a fraction of C(0).
    pub threshold: Option<f64>,
}

impl Default for AutocrrConfig {
    fn default() -> Self {
        Self {
            domain:       0,
            periodic:     false,
            subtract_ave: true,
            report_rms:   false,
            report_nsum:  false,
            threshold:    None,
        }
    }
}

impl AutocrrConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.threshold {
            if !(-1.0..=1.0).contains(&t) {
                return Err(AutocrrError::Configuration(format!(
                    "Error: Expected a number between -1.0 and 1.0 for the threshold.\n       \
                     (This \"threshold\" should be expressed as a fraction of <(x-<x>)^2>)\n       \
                     Instead, you specified {t}"
                )));
            }
        }
        Ok(())
    }

    /// Cutoff that stops accumulation at large lags.
    ///
    /// Only active when the domain is chosen automatically. A threshold of -1
    /// can never be crossed, so it switches truncation off.
    pub fn truncation_threshold(&self) -> Option<f64> {
        if self.domain > 0 {
            return None;
        }
        match self.threshold {
            Some(t) if t <= -1.0 => None,
            Some(t) => Some(t),
            None => Some(DEFAULT_THRESHOLD),
        }
    }

    /// Fraction of C(0) used to estimate the correlation length.
    pub fn persistence_threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// True when the caller picked a threshold above -1. Such a run only
    /// accepts a single data set, whether or not the domain is fixed.
    pub fn explicit_threshold(&self) -> bool {
        self.threshold.map_or(false, |t| t > -1.0)
    }
}
