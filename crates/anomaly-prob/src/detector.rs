//! Threshold detector: a stateless predicate over anomaly scores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};

/// Threshold used when none is configured.
///
/// Scores are the probability mass left of the value under the baseline
/// model, so a value near 1 is rare under the baseline.
pub const DEFAULT_THRESHOLD: f64 = 0.99;

/// Decision threshold in the open interval `(0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> ScoringResult<Self> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(ScoringError::InvalidThreshold(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ScoringError;

    fn try_from(value: f64) -> ScoringResult<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-value anomaly decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    Normal,
    Anomalous,
}

impl AnomalyFlag {
    pub fn is_anomalous(self) -> bool {
        matches!(self, AnomalyFlag::Anomalous)
    }
}

impl From<bool> for AnomalyFlag {
    fn from(anomalous: bool) -> Self {
        if anomalous {
            AnomalyFlag::Anomalous
        } else {
            AnomalyFlag::Normal
        }
    }
}

impl fmt::Display for AnomalyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyFlag::Normal => write!(f, "normal"),
            AnomalyFlag::Anomalous => write!(f, "anomalous"),
        }
    }
}

/// `score >= threshold`. The equality case flags.
#[inline]
pub fn detect(score: f64, threshold: Threshold) -> AnomalyFlag {
    AnomalyFlag::from(score >= threshold.0)
}

/// [`detect`] over a batch of scores, order preserved.
pub fn detect_all(scores: &[f64], threshold: Threshold) -> Vec<AnomalyFlag> {
    scores.iter().map(|&s| detect(s, threshold)).collect()
}
