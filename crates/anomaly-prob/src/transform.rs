//! The normalizing transform shared by baseline fitting and scoring.
//!
//! Reconstruction errors are non-negative and right-skewed. A shifted
//! logarithm pulls them onto a scale that is much closer to Gaussian, which
//! is what the CDF scoring step assumes.

use crate::error::{ScoringError, ScoringResult};

/// Shift added before taking the logarithm so that `transform(0.0)` is finite.
///
/// Fitting and scoring must use the same value; it is recorded on every
/// fitted [`BaselineParameters`](crate::BaselineParameters).
pub const EPSILON: f64 = 1e-6;

/// `ln(x + EPSILON)`.
///
/// Strictly increasing on `x >= 0`. Does not validate its input; use
/// [`checked_transform`] on untrusted values.
#[inline]
pub fn transform(x: f64) -> f64 {
    (x + EPSILON).ln()
}

/// Whether `x` lies in the transform's domain (finite and non-negative).
#[inline]
pub fn is_valid_error(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

/// Transform a single value, rejecting negative or non-finite input.
pub fn checked_transform(x: f64) -> ScoringResult<f64> {
    checked_transform_at(0, x)
}

pub(crate) fn checked_transform_at(index: usize, x: f64) -> ScoringResult<f64> {
    if !is_valid_error(x) {
        return Err(ScoringError::InvalidInput { index, value: x });
    }
    Ok(transform(x))
}

/// Transform a whole sample. Fails on the first invalid element, reporting
/// its index; nothing is returned for a partially valid sample.
pub fn transform_all(values: &[f64]) -> ScoringResult<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &x)| checked_transform_at(i, x))
        .collect()
}
