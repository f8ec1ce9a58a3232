//! Scorer: maps error values to cumulative probabilities under the fitted
//! Gaussian model of transformed baseline errors.

use rayon::prelude::*;

use crate::baseline::BaselineParameters;
use crate::config::ScoringConfig;
use crate::error::{ScoringError, ScoringResult};
use crate::stats::standard_normal_cdf;
use crate::transform::checked_transform_at;

/// Standardized transformed value `(transform(x) - mu) / sigma`.
///
/// Fails with `DegenerateBaseline` when `sigma <= 0` and with
/// `InvalidInput` for negative or non-finite `x`.
pub fn z_score(x: f64, params: &BaselineParameters) -> ScoringResult<f64> {
    z_score_at(0, x, params)
}

fn ensure_scorable(params: &BaselineParameters) -> ScoringResult<()> {
    if params.is_usable() {
        Ok(())
    } else {
        Err(ScoringError::DegenerateBaseline {
            sigma: params.sigma(),
        })
    }
}

fn z_score_at(index: usize, x: f64, params: &BaselineParameters) -> ScoringResult<f64> {
    ensure_scorable(params)?;
    let t = checked_transform_at(index, x)?;
    Ok(standardize(t, params))
}

fn standardize(t: f64, params: &BaselineParameters) -> f64 {
    (t - params.mu()) / params.sigma()
}

/// Probability for an already transformed value. Callers must have checked
/// `params.is_usable()`; every scoring path in the crate ends here.
pub(crate) fn score_transformed(t: f64, params: &BaselineParameters) -> f64 {
    standard_normal_cdf(standardize(t, params))
}

fn score_at(index: usize, x: f64, params: &BaselineParameters) -> ScoringResult<f64> {
    ensure_scorable(params)?;
    let t = checked_transform_at(index, x)?;
    Ok(score_transformed(t, params))
}

/// Anomaly probability `Φ((transform(x) - mu) / sigma)` in `[0, 1]`.
///
/// Pure and deterministic; non-decreasing in `x`.
pub fn score(x: f64, params: &BaselineParameters) -> ScoringResult<f64> {
    score_at(0, x, params)
}

/// [`score`] over an ordered batch. Output has the same length and order.
///
/// Fails atomically: the first invalid value aborts the batch and no partial
/// output is returned.
pub fn score_batch(xs: &[f64], params: &BaselineParameters) -> ScoringResult<Vec<f64>> {
    ensure_scorable(params)?;
    xs.iter()
        .enumerate()
        .map(|(i, &x)| score_at(i, x, params))
        .collect()
}

/// [`score_batch`] evaluated on the rayon thread pool.
///
/// Same contract and same results; when several values are invalid the
/// reported index is not necessarily the lowest one.
pub fn par_score_batch(xs: &[f64], params: &BaselineParameters) -> ScoringResult<Vec<f64>> {
    ensure_scorable(params)?;
    xs.par_iter()
        .enumerate()
        .map(|(i, &x)| score_at(i, x, params))
        .collect()
}

/// Scoring bound to one validated set of parameters.
///
/// The parameters are checked against the minimum-sigma policy once, at
/// construction, so every later call only has to validate its inputs.
#[derive(Clone, Debug)]
pub struct Scorer {
    params: BaselineParameters,
    config: ScoringConfig,
}

impl Scorer {
    /// Bind to `params` under the default policy.
    pub fn new(params: BaselineParameters) -> ScoringResult<Self> {
        Self::with_config(params, ScoringConfig::default())
    }

    /// Bind to `params` under `config`'s minimum-sigma and parallelism policy.
    pub fn with_config(params: BaselineParameters, config: ScoringConfig) -> ScoringResult<Self> {
        params.ensure_usable(config.min_sigma.max(0.0))?;
        Ok(Self { params, config })
    }

    pub fn params(&self) -> &BaselineParameters {
        &self.params
    }

    pub fn z_score(&self, x: f64) -> ScoringResult<f64> {
        z_score(x, &self.params)
    }

    pub fn score(&self, x: f64) -> ScoringResult<f64> {
        score(x, &self.params)
    }

    /// Score a batch, switching to parallel evaluation for large batches
    /// when the configuration allows it.
    pub fn score_batch(&self, xs: &[f64]) -> ScoringResult<Vec<f64>> {
        if self.config.use_parallel(xs.len()) {
            par_score_batch(xs, &self.params)
        } else {
            score_batch(xs, &self.params)
        }
    }

    pub fn par_score_batch(&self, xs: &[f64]) -> ScoringResult<Vec<f64>> {
        par_score_batch(xs, &self.params)
    }
}

impl TryFrom<BaselineParameters> for Scorer {
    type Error = ScoringError;

    fn try_from(params: BaselineParameters) -> ScoringResult<Self> {
        Self::new(params)
    }
}
