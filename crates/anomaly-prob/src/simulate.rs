//! Seeded data generators for demos and tests.
//!
//! Reconstruction errors from a well-behaved model look roughly Gamma
//! distributed: non-negative with a long right tail. An anomaly is modelled
//! as a contiguous run of errors lifted by a Gaussian offset.
//!
//! Every generator takes an explicit random source; nothing here touches a
//! global RNG.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScoringError, ScoringResult};

/// Parameters of the synthetic train/test scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub gamma_shape: f64,
    pub gamma_scale: f64,
    pub n_train: usize,
    pub n_test: usize,
    /// First test index of the injected run.
    pub anomaly_start: usize,
    /// One past the last test index of the injected run.
    pub anomaly_end: usize,
    pub offset_mean: f64,
    pub offset_std: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            gamma_shape: 2.0,
            gamma_scale: 0.5,
            n_train: 1000,
            n_test: 200,
            anomaly_start: 100,
            anomaly_end: 130,
            offset_mean: 4.0,
            offset_std: 0.5,
        }
    }
}

impl SimulationConfig {
    pub fn anomaly_range(&self) -> Range<usize> {
        self.anomaly_start..self.anomaly_end
    }

    /// Generate the scenario from `self.seed`.
    pub fn run(&self) -> ScoringResult<SimulatedData> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        simulate(&mut rng, self)
    }
}

/// Output of [`simulate`].
#[derive(Debug, Clone)]
pub struct SimulatedData {
    /// Known-normal errors for fitting the baseline.
    pub train: Vec<f64>,
    /// Errors to score; contains the injected run.
    pub test: Vec<f64>,
    /// Test indices that received the offset (clamped to the test length).
    pub anomaly_range: Range<usize>,
}

impl SimulatedData {
    pub fn is_injected(&self, index: usize) -> bool {
        self.anomaly_range.contains(&index)
    }
}

/// `n` draws from Gamma(`shape`, `scale`).
pub fn gamma_errors<R: Rng + ?Sized>(
    rng: &mut R,
    shape: f64,
    scale: f64,
    n: usize,
) -> ScoringResult<Vec<f64>> {
    let gamma = Gamma::new(shape, scale)
        .map_err(|e| ScoringError::InvalidDistribution(format!("gamma({shape}, {scale}): {e}")))?;
    Ok((0..n).map(|_| gamma.sample(rng)).collect())
}

/// Add Normal(`mean`, `std`) noise to `errors[range]`.
///
/// The range is clamped to the slice. Results are floored at zero so the
/// output stays a valid error sample.
pub fn inject_offset<R: Rng + ?Sized>(
    rng: &mut R,
    errors: &mut [f64],
    range: Range<usize>,
    mean: f64,
    std: f64,
) -> ScoringResult<Range<usize>> {
    let normal = Normal::new(mean, std)
        .map_err(|e| ScoringError::InvalidDistribution(format!("normal({mean}, {std}): {e}")))?;

    let end = range.end.min(errors.len());
    let start = range.start.min(end);
    for e in &mut errors[start..end] {
        *e = (*e + normal.sample(rng)).max(0.0);
    }
    Ok(start..end)
}

/// Build the train/test scenario described by `config` from `rng`.
///
/// Draw order is train, then test, then offsets, so a given seed always
/// yields the same data.
pub fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SimulationConfig,
) -> ScoringResult<SimulatedData> {
    let train = gamma_errors(rng, config.gamma_shape, config.gamma_scale, config.n_train)?;
    let mut test = gamma_errors(rng, config.gamma_shape, config.gamma_scale, config.n_test)?;
    let anomaly_range = inject_offset(
        rng,
        &mut test,
        config.anomaly_range(),
        config.offset_mean,
        config.offset_std,
    )?;

    debug!(
        n_train = train.len(),
        n_test = test.len(),
        anomaly_start = anomaly_range.start,
        anomaly_end = anomaly_range.end,
        "simulated error series"
    );

    Ok(SimulatedData {
        train,
        test,
        anomaly_range,
    })
}
