//! Baseline type definitions.
//!
//! `BaselineParameters` is the in-memory, validated fit result;
//! `BaselineRecord` is its versioned, serializable form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};
use crate::transform::EPSILON;

use super::RECORD_FORMAT_VERSION;

// ── Baseline Parameters ─────────────────────────────────────────────────

/// Location and scale of the transformed baseline errors.
///
/// Immutable once built. A sigma of exactly zero is representable (a
/// one-element or constant baseline fits to it) but such parameters are not
/// usable: every scoring call against them fails with
/// [`ScoringError::DegenerateBaseline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineParameters {
    mu: f64,
    sigma: f64,
    epsilon: f64,
    sample_count: usize,
}

impl BaselineParameters {
    /// Build parameters from a known `(mu, sigma)` pair.
    ///
    /// Rejects non-finite mu with `InvalidLocation`, and non-finite or
    /// negative sigma with `DegenerateBaseline`. Zero sigma is accepted
    /// and yields unusable parameters.
    pub fn new(mu: f64, sigma: f64) -> ScoringResult<Self> {
        Self::from_parts(mu, sigma, 0)
    }

    pub(crate) fn from_parts(mu: f64, sigma: f64, sample_count: usize) -> ScoringResult<Self> {
        if !mu.is_finite() {
            return Err(ScoringError::InvalidLocation { mu });
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(ScoringError::DegenerateBaseline { sigma });
        }
        Ok(Self {
            mu,
            sigma,
            epsilon: EPSILON,
            sample_count,
        })
    }

    /// Mean of the transformed baseline.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Population standard deviation of the transformed baseline.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Transform shift these parameters were fitted with.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of baseline values the parameters were fitted on (0 when
    /// constructed directly).
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Whether scoring against these parameters is defined.
    pub fn is_usable(&self) -> bool {
        self.sigma > 0.0
    }

    /// Fail with `DegenerateBaseline` unless sigma is strictly positive and
    /// at least `min_sigma`.
    pub fn ensure_usable(&self, min_sigma: f64) -> ScoringResult<()> {
        if self.sigma <= 0.0 || self.sigma < min_sigma {
            return Err(ScoringError::DegenerateBaseline { sigma: self.sigma });
        }
        Ok(())
    }

    /// Snapshot into a serializable record stamped with the current time.
    pub fn to_record(&self) -> BaselineRecord {
        BaselineRecord {
            format_version: RECORD_FORMAT_VERSION,
            mu: self.mu,
            sigma: self.sigma,
            epsilon: self.epsilon,
            sample_count: self.sample_count,
            fitted_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for BaselineParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mu={:.4} sigma={:.4} (n={}, epsilon={:e})",
            self.mu, self.sigma, self.sample_count, self.epsilon
        )
    }
}

// ── Baseline Record ─────────────────────────────────────────────────────

/// Versioned `{mu, sigma, epsilon}` record for storage or transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub format_version: u32,
    pub mu: f64,
    pub sigma: f64,
    pub epsilon: f64,
    #[serde(default)]
    pub sample_count: usize,
    pub fitted_at: DateTime<Utc>,
}

impl BaselineRecord {
    /// Restore parameters, checking format version and transform shift.
    pub fn to_parameters(&self) -> ScoringResult<BaselineParameters> {
        if self.format_version != RECORD_FORMAT_VERSION {
            return Err(ScoringError::UnsupportedFormat(self.format_version));
        }
        if self.epsilon != EPSILON {
            return Err(ScoringError::EpsilonMismatch {
                expected: EPSILON,
                found: self.epsilon,
            });
        }
        BaselineParameters::from_parts(self.mu, self.sigma, self.sample_count)
    }
}
