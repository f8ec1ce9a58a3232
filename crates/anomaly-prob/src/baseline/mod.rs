//! Baseline fitting: learn `(mu, sigma)` of transformed errors from a trusted
//! "normal" sample.
//!
//! ## Architecture
//!
//! ```text
//!   baseline errors ──► transform_all ──► mean / population std
//!                                              │
//!                                              ▼
//!                                      BaselineParameters ──► BaselineRecord ──► BaselineStore
//! ```
//!
//! Parameters are immutable. Re-calibration produces a fresh value; nothing
//! here mutates a fitted baseline in place.

pub mod estimator;
pub mod persistence;
pub mod types;

pub use estimator::{fit, BaselineEstimator};
pub use persistence::{BaselineStore, InMemoryBaseline, JsonFileBaseline};
pub use types::{BaselineParameters, BaselineRecord};

/// Current on-disk format version of [`BaselineRecord`].
pub const RECORD_FORMAT_VERSION: u32 = 1;
