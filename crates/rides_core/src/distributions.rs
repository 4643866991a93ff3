//! Sampling primitives shared by the context, ride and volume models.
//!
//! Categorical draws go through [`normalize`] first, which clamps negative
//! mass to zero and refuses vectors that cannot form a distribution.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson, StandardNormal};

use crate::error::SamplingError;

/// Draw from N(mean, sd).
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sd * z
}

/// Draw from N(mean, sd) and clamp into [lo, hi].
pub fn bounded_gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64, lo: f64, hi: f64) -> f64 {
    gaussian(rng, mean, sd).clamp(lo, hi)
}

/// Draw from a log-normal whose underlying normal is N(mu, sigma).
pub fn lognormal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> f64 {
    gaussian(rng, mu, sigma).exp()
}

/// Draw a Poisson count with rate `lambda`.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> Result<u64, SamplingError> {
    let dist = Poisson::new(lambda).map_err(|e| SamplingError::InvalidParameters {
        what: "poisson",
        reason: format!("lambda={lambda}: {e}"),
    })?;
    let draw: f64 = dist.sample(rng);
    Ok(draw as u64)
}

/// Clamp negative components to zero and rescale so the vector sums to 1.
pub fn normalize<const N: usize>(
    what: &'static str,
    weights: [f64; N],
) -> Result<[f64; N], SamplingError> {
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(SamplingError::NonFinite {
            what,
            weights: weights.to_vec(),
        });
    }
    let clamped = weights.map(|w| w.max(0.0));
    let total: f64 = clamped.iter().sum();
    if total <= 0.0 {
        return Err(SamplingError::NoMass {
            what,
            weights: weights.to_vec(),
        });
    }
    Ok(clamped.map(|w| w / total))
}

/// Pick an index with probability proportional to `weights`.
pub fn categorical<R: Rng + ?Sized, const N: usize>(
    rng: &mut R,
    what: &'static str,
    weights: [f64; N],
) -> Result<usize, SamplingError> {
    let probs = normalize(what, weights)?;
    let mut cumulative = [0.0; N];
    let mut total = 0.0;
    for (slot, p) in cumulative.iter_mut().zip(probs) {
        total += p;
        *slot = total;
    }
    let r: f64 = rng.gen_range(0.0..total);
    Ok(cumulative.partition_point(|&w| w <= r).min(N - 1))
}

/// Uniform pick from a non-empty slice.
pub fn pick<'a, R: Rng + ?Sized, T>(
    rng: &mut R,
    what: &'static str,
    items: &'a [T],
) -> Result<&'a T, SamplingError> {
    items.choose(rng).ok_or_else(|| SamplingError::NoMass {
        what,
        weights: Vec::new(),
    })
}

/// Split `total` units across categories with the given probabilities.
///
/// Uses sequential conditional binomials, so the returned counts always sum to
/// exactly `total`.
pub fn multinomial<R: Rng + ?Sized>(
    rng: &mut R,
    what: &'static str,
    total: u64,
    probs: &[f64],
) -> Result<Vec<u64>, SamplingError> {
    if probs.is_empty() {
        return Err(SamplingError::NoMass {
            what,
            weights: Vec::new(),
        });
    }
    if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(SamplingError::NonFinite {
            what,
            weights: probs.to_vec(),
        });
    }

    let mut counts = Vec::with_capacity(probs.len());
    let mut remaining = total;
    let mut remaining_mass: f64 = probs.iter().sum();
    let last = probs.len() - 1;

    for (i, &p) in probs.iter().enumerate() {
        if i == last {
            counts.push(remaining);
            break;
        }
        if remaining == 0 || remaining_mass <= 0.0 {
            counts.push(0);
            continue;
        }
        let conditional = (p / remaining_mass).clamp(0.0, 1.0);
        let draw = Binomial::new(remaining, conditional)
            .map_err(|e| SamplingError::InvalidParameters {
                what,
                reason: e.to_string(),
            })?
            .sample(rng);
        counts.push(draw);
        remaining -= draw;
        remaining_mass -= p;
    }

    Ok(counts)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Money fields are kept to cents.
pub fn money(value: f64) -> f64 {
    round_to(value, 2)
}
