//! Scoring configuration.

use serde::{Deserialize, Serialize};

use crate::detector::{Threshold, DEFAULT_THRESHOLD};
use crate::error::ScoringResult;

/// Default minimum usable baseline scale.
///
/// Parameters whose sigma falls below this are treated as degenerate by
/// [`BaselineEstimator`](crate::BaselineEstimator) and [`Scorer`](crate::Scorer).
pub const DEFAULT_MIN_SIGMA: f64 = 1e-9;

/// Batches shorter than this are scored sequentially even when parallel
/// scoring is enabled.
pub const DEFAULT_PARALLEL_MIN_BATCH: usize = 4096;

/// Tunables for the fit → score → detect pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Decision threshold applied to anomaly probabilities.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Minimum baseline sigma accepted for scoring.
    #[serde(default = "default_min_sigma")]
    pub min_sigma: f64,

    /// Score large batches on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Minimum batch length before parallel scoring kicks in.
    #[serde(default = "default_parallel_min_batch")]
    pub parallel_min_batch: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_sigma: DEFAULT_MIN_SIGMA,
            parallel: true,
            parallel_min_batch: DEFAULT_PARALLEL_MIN_BATCH,
        }
    }
}

impl ScoringConfig {
    /// The configured threshold, validated.
    pub fn threshold(&self) -> ScoringResult<Threshold> {
        Threshold::new(self.threshold)
    }

    /// Whether a batch of `len` values should be scored in parallel.
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.parallel_min_batch
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_min_sigma() -> f64 {
    DEFAULT_MIN_SIGMA
}

fn default_true() -> bool {
    true
}

fn default_parallel_min_batch() -> usize {
    DEFAULT_PARALLEL_MIN_BATCH
}
