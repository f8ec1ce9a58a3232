//! # anomaly-prob
//!
//! Turns unbounded, right-skewed reconstruction errors into anomaly
//! probabilities in `[0, 1]`.
//!
//! A baseline of known-normal errors is log-transformed and summarized by a
//! mean and standard deviation. New errors go through the same transform and
//! are scored with the standard normal CDF of their z-score. A threshold on
//! that score gives the anomaly flag.
//!
//! ## Architecture
//!
//! ```text
//!   baseline errors          new errors
//!         │                      │
//!         ▼                      ▼
//!   ┌────────────┐        ┌────────────┐
//!   │ transform  │        │ transform  │   ln(x + EPSILON)
//!   └─────┬──────┘        └─────┬──────┘
//!         ▼                     │
//!   ┌────────────┐              │
//!   │ estimator  │──(mu,sigma)──┤
//!   └────────────┘              ▼
//!                         ┌────────────┐
//!                         │  scorer    │   Φ((t - mu) / sigma)
//!                         └─────┬──────┘
//!                               ▼
//!                         ┌────────────┐
//!                         │  detector  │   score >= threshold
//!                         └─────┬──────┘
//!                               ▼
//!                     ScoredPoint / AnomalyFlag
//! ```
//!
//! [`ScoringSession`] wraps the whole pipeline around an atomically swapped
//! baseline snapshot so re-calibration can run alongside scoring.
//!
//! ## Quick Start
//!
//! ```rust
//! use anomaly_prob::{detect, fit, score, Threshold};
//!
//! let baseline = [0.8, 1.1, 0.6, 1.4, 0.9, 1.0, 0.7, 1.2];
//! let params = fit(&baseline).unwrap();
//!
//! let p = score(9.0, &params).unwrap();
//! assert!(detect(p, Threshold::default()).is_anomalous());
//! ```

#![deny(unsafe_code)]

pub mod baseline;
pub mod config;
pub mod detector;
pub mod error;
pub mod scorer;
pub mod session;
pub mod simulate;
pub mod stats;
pub mod transform;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use baseline::{
    fit, BaselineEstimator, BaselineParameters, BaselineRecord, BaselineStore,
    InMemoryBaseline, JsonFileBaseline, RECORD_FORMAT_VERSION,
};
pub use config::{ScoringConfig, DEFAULT_MIN_SIGMA};
pub use detector::{detect, detect_all, AnomalyFlag, Threshold, DEFAULT_THRESHOLD};
pub use error::{ScoringError, ScoringResult};
pub use scorer::{par_score_batch, score, score_batch, z_score, Scorer};
pub use session::{CalibratedBaseline, ScoredPoint, ScoredSeries, ScoringSession};
pub use simulate::{SimulatedData, SimulationConfig};
pub use stats::standard_normal_cdf;
pub use transform::{checked_transform, transform, EPSILON};
