// synth.rs - Synthetic time series with known correlation properties

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::error::{AutocrrError, Result};

/// Deterministic RNG for trajectory `stream` of a run seeded with `master`.
pub fn stream_rng(master: u64, stream: usize) -> ChaCha20Rng {
    // splitmix64 finalizer
    let mut x = master ^ (stream as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    ChaCha20Rng::seed_from_u64(x)
}

/// x(i) = exp(-i/τ)
pub fn exponential_decay(n: usize, tau: f64) -> Vec<f64> {
    (0..n).map(|i| (-(i as f64) / tau).exp()).collect()
}

/// +1, -1, +1, ...
pub fn alternating(n: usize) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect()
}

/// AR(1) process x(i) = φ·x(i-1) + σ·ε(i), started from its stationary
/// distribution. Its correlation length is -1/ln φ.
pub fn ar1<R: Rng + ?Sized>(n: usize, phi: f64, sigma: f64, rng: &mut R) -> Result<Vec<f64>> {
    Ok(ar1_vectors(n, 1, phi, sigma, rng)?.into_iter().flatten().collect())
}

/// `dim` independent AR(1) components per sample.
pub fn ar1_vectors<R: Rng + ?Sized>(
    n: usize,
    dim: usize,
    phi: f64,
    sigma: f64,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    if !(phi.abs() < 1.0) {
        return Err(AutocrrError::Configuration(format!(
            "AR(1) coefficient must lie in (-1, 1), got {phi}"
        )));
    }
    let noise = Normal::new(0.0, sigma)
        .map_err(|e| AutocrrError::Configuration(format!("invalid noise width {sigma}: {e}")))?;
    let stationary = sigma / (1.0 - phi * phi).sqrt();

    let mut x: Vec<f64> = (0..dim)
        .map(|_| {
            let z: f64 = StandardNormal.sample(rng);
            stationary * z
        })
        .collect();
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(x.clone());
        for v in x.iter_mut() {
            *v = phi * *v + noise.sample(rng);
        }
    }
    Ok(out)
}

/// Wrap a scalar series as one-dimensional samples.
pub fn as_samples(x: &[f64]) -> Vec<Vec<f64>> {
    x.iter().map(|&v| vec![v]).collect()
}
