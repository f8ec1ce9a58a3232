//! Baseline estimator: fits `(mu, sigma)` on the transformed baseline.

use tracing::{debug, warn};

use crate::config::{ScoringConfig, DEFAULT_MIN_SIGMA};
use crate::error::{ScoringError, ScoringResult};
use crate::stats::mean_and_std;
use crate::transform::transform_all;

use super::types::BaselineParameters;

/// Fit baseline parameters from known-normal reconstruction errors.
///
/// Applies the shared transform elementwise, then takes the arithmetic mean
/// and population standard deviation. A one-element or constant sample fits
/// to `sigma == 0`; the result is returned but is not usable for scoring.
pub fn fit(baseline_errors: &[f64]) -> ScoringResult<BaselineParameters> {
    if baseline_errors.is_empty() {
        return Err(ScoringError::EmptyBaseline);
    }

    let transformed = transform_all(baseline_errors)?;
    let (mu, sigma) = mean_and_std(&transformed).ok_or(ScoringError::EmptyBaseline)?;
    let params = BaselineParameters::from_parts(mu, sigma, baseline_errors.len())?;

    if params.is_usable() {
        debug!(
            samples = baseline_errors.len(),
            mu = params.mu(),
            sigma = params.sigma(),
            "baseline fitted"
        );
    } else {
        warn!(
            samples = baseline_errors.len(),
            mu = params.mu(),
            "baseline has zero spread; parameters cannot be used for scoring"
        );
    }

    Ok(params)
}

/// Baseline fitting with a minimum-sigma policy.
///
/// Unlike [`fit`], degenerate baselines are rejected here immediately
/// instead of being returned as unusable parameters.
#[derive(Clone, Debug)]
pub struct BaselineEstimator {
    min_sigma: f64,
}

impl BaselineEstimator {
    /// Create an estimator rejecting baselines with sigma below `min_sigma`.
    pub fn new(min_sigma: f64) -> Self {
        Self {
            min_sigma: min_sigma.max(0.0),
        }
    }

    /// Create an estimator from scoring configuration.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.min_sigma)
    }

    /// The minimum accepted sigma.
    pub fn min_sigma(&self) -> f64 {
        self.min_sigma
    }

    /// Fit and validate in one step.
    pub fn fit(&self, baseline_errors: &[f64]) -> ScoringResult<BaselineParameters> {
        let params = fit(baseline_errors)?;
        params.ensure_usable(self.min_sigma)?;
        Ok(params)
    }
}

impl Default for BaselineEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SIGMA)
    }
}
