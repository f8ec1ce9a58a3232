//! Scoring session: the fit → score → detect pipeline over a published,
//! versioned baseline snapshot.
//!
//! ```text
//!   recalibrate(baseline) ──► BaselineEstimator::fit ──► ArcSwap::rcu (generation + 1)
//!                                                              │
//!   score_series(errors)  ──► load snapshot once ──► transform ─┴─► Φ ──► detect ──► ScoredSeries
//! ```
//!
//! A batch loads one snapshot and scores every element against it, so a
//! concurrent re-calibration can never mix two baselines inside one result.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::baseline::{BaselineEstimator, BaselineParameters};
use crate::config::ScoringConfig;
use crate::detector::{detect, AnomalyFlag, Threshold};
use crate::error::ScoringResult;
use crate::scorer::score_transformed;
use crate::transform::checked_transform_at;

// ── Snapshot ────────────────────────────────────────────────────────────

/// A published baseline: parameters plus the generation they were
/// published under.
#[derive(Clone, Debug)]
pub struct CalibratedBaseline {
    pub generation: u64,
    pub params: BaselineParameters,
    pub calibrated_at: DateTime<Utc>,
}

impl CalibratedBaseline {
    fn new(generation: u64, params: BaselineParameters) -> Self {
        Self {
            generation,
            params,
            calibrated_at: Utc::now(),
        }
    }
}

// ── Output ──────────────────────────────────────────────────────────────

/// One scored value, in the shape downstream alerting or plotting expects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub index: u64,
    pub raw_error: f64,
    pub transformed: f64,
    pub score: f64,
    pub flag: AnomalyFlag,
}

/// The result of scoring one ordered series against one baseline snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredSeries {
    /// Generation of the baseline every point was scored against.
    pub generation: u64,
    /// When that baseline was published.
    pub calibrated_at: DateTime<Utc>,
    pub threshold: Threshold,
    pub points: Vec<ScoredPoint>,
}

impl ScoredSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn flagged(&self) -> impl Iterator<Item = &ScoredPoint> {
        self.points.iter().filter(|p| p.flag.is_anomalous())
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }

    pub fn flagged_indices(&self) -> Vec<u64> {
        self.flagged().map(|p| p.index).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.score).collect()
    }

    pub fn get(&self, index: u64) -> Option<&ScoredPoint> {
        self.points.iter().find(|p| p.index == index)
    }
}

// ── Session ─────────────────────────────────────────────────────────────

/// Holds the current baseline and scores series against it.
pub struct ScoringSession {
    current: ArcSwap<CalibratedBaseline>,
    estimator: BaselineEstimator,
    threshold: Threshold,
    config: ScoringConfig,
}

impl ScoringSession {
    /// Fit a baseline and start a session on it (generation 1).
    pub fn calibrate(baseline_errors: &[f64], config: ScoringConfig) -> ScoringResult<Self> {
        let estimator = BaselineEstimator::from_config(&config);
        let params = estimator.fit(baseline_errors)?;
        Self::build(params, estimator, config)
    }

    /// Start a session on already fitted (e.g. restored) parameters.
    pub fn from_parameters(
        params: BaselineParameters,
        config: ScoringConfig,
    ) -> ScoringResult<Self> {
        let estimator = BaselineEstimator::from_config(&config);
        params.ensure_usable(estimator.min_sigma())?;
        Self::build(params, estimator, config)
    }

    fn build(
        params: BaselineParameters,
        estimator: BaselineEstimator,
        config: ScoringConfig,
    ) -> ScoringResult<Self> {
        let threshold = config.threshold()?;
        debug!(%params, %threshold, "scoring session started");
        Ok(Self {
            current: ArcSwap::from_pointee(CalibratedBaseline::new(1, params)),
            estimator,
            threshold,
            config,
        })
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// The currently published baseline.
    pub fn snapshot(&self) -> Arc<CalibratedBaseline> {
        self.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Fit a new baseline and publish it atomically.
    ///
    /// On failure the previously published baseline stays in place.
    pub fn recalibrate(&self, baseline_errors: &[f64]) -> ScoringResult<Arc<CalibratedBaseline>> {
        match self.estimator.fit(baseline_errors) {
            Ok(params) => Ok(self.swap_in(params)),
            Err(e) => {
                warn!(
                    error = %e,
                    generation = self.generation(),
                    "recalibration rejected; keeping current baseline"
                );
                Err(e)
            }
        }
    }

    /// Publish externally fitted parameters.
    pub fn publish(&self, params: BaselineParameters) -> ScoringResult<Arc<CalibratedBaseline>> {
        params.ensure_usable(self.estimator.min_sigma())?;
        Ok(self.swap_in(params))
    }

    fn swap_in(&self, params: BaselineParameters) -> Arc<CalibratedBaseline> {
        let mut published = None;
        self.current.rcu(|current| {
            let next = Arc::new(CalibratedBaseline::new(current.generation + 1, params));
            published = Some(Arc::clone(&next));
            next
        });
        let published = published.unwrap_or_else(|| self.current.load_full());
        debug!(
            generation = published.generation,
            params = %published.params,
            "baseline published"
        );
        published
    }

    /// Score an ordered series; point indices are positions `0..n`.
    pub fn score_series(&self, errors: &[f64]) -> ScoringResult<ScoredSeries> {
        let indexed: Vec<(u64, f64)> = errors
            .iter()
            .enumerate()
            .map(|(i, &x)| (i as u64, x))
            .collect();
        self.score_indexed(&indexed)
    }

    /// Score `(index, error)` pairs in the given order.
    ///
    /// Indices are carried through untouched. Fails atomically on the first
    /// invalid error value (reported by position, not by caller index).
    pub fn score_indexed(&self, points: &[(u64, f64)]) -> ScoringResult<ScoredSeries> {
        let snapshot = self.snapshot();
        let params = snapshot.params;
        let threshold = self.threshold;

        let score_one = |(pos, &(index, raw_error)): (usize, &(u64, f64))| -> ScoringResult<ScoredPoint> {
            let transformed = checked_transform_at(pos, raw_error)?;
            let score = score_transformed(transformed, &params);
            Ok(ScoredPoint {
                index,
                raw_error,
                transformed,
                score,
                flag: detect(score, threshold),
            })
        };

        let scored: ScoringResult<Vec<ScoredPoint>> = if self.config.use_parallel(points.len()) {
            points.par_iter().enumerate().map(score_one).collect()
        } else {
            points.iter().enumerate().map(score_one).collect()
        };
        let points = scored?;

        debug!(
            generation = snapshot.generation,
            points = points.len(),
            flagged = points.iter().filter(|p| p.flag.is_anomalous()).count(),
            "series scored"
        );

        Ok(ScoredSeries {
            generation: snapshot.generation,
            calibrated_at: snapshot.calibrated_at,
            threshold,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;

    fn baseline() -> Vec<f64> {
        vec![0.4, 0.9, 1.3, 0.7, 1.1, 0.5, 0.8, 1.6, 0.6, 1.0]
    }

    #[test]
    fn calibrate_starts_at_generation_one() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        assert_eq!(session.generation(), 1);
        assert_eq!(session.snapshot().params.sample_count(), 10);
    }

    #[test]
    fn calibrate_rejects_degenerate_and_empty_baselines() {
        assert!(matches!(
            ScoringSession::calibrate(&[0.3], ScoringConfig::default()),
            Err(ScoringError::DegenerateBaseline { .. })
        ));
        assert!(matches!(
            ScoringSession::calibrate(&[], ScoringConfig::default()),
            Err(ScoringError::EmptyBaseline)
        ));
    }

    #[test]
    fn calibrate_rejects_invalid_threshold() {
        let cfg = ScoringConfig {
            threshold: 0.0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            ScoringSession::calibrate(&baseline(), cfg),
            Err(ScoringError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn score_series_produces_ordered_points() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let series = session.score_series(&[0.8, 50.0, 0.1]).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.generation, 1);
        let indices: Vec<u64> = series.points.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(series.flagged_indices(), vec![1]);
        assert!((series.points[1].raw_error - 50.0).abs() < f64::EPSILON);
        assert!((series.points[1].transformed - crate::transform::transform(50.0)).abs() < 1e-12);
    }

    #[test]
    fn session_scores_match_free_function() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let params = session.snapshot().params;
        let xs = [0.2, 0.8, 3.0];
        let series = session.score_series(&xs).unwrap();
        let expected = crate::scorer::score_batch(&xs, &params).unwrap();
        assert_eq!(series.scores(), expected);
    }

    #[test]
    fn session_scores_match_scorer_on_wide_range() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let params = session.snapshot().params;
        let xs: Vec<f64> = (0..400).map(|i| 1e-7 * 1.08f64.powi(i)).collect();
        let series = session.score_series(&xs).unwrap();
        for (x, point) in xs.iter().zip(&series.points) {
            assert_eq!(point.score, crate::scorer::score(*x, &params).unwrap());
            assert_eq!(point.transformed, crate::transform::transform(*x));
        }
    }

    #[test]
    fn series_carries_snapshot_calibration_time() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let first = session.score_series(&[0.5]).unwrap();
        assert_eq!(first.calibrated_at, session.snapshot().calibrated_at);

        let republished = session.recalibrate(&baseline()).unwrap();
        let second = session.score_series(&[0.5]).unwrap();
        assert_eq!(second.calibrated_at, republished.calibrated_at);
        assert!(second.calibrated_at >= first.calibrated_at);
    }

    #[test]
    fn score_indexed_keeps_caller_indices() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let series = session
            .score_indexed(&[(1000, 0.5), (1005, 40.0), (1010, 0.9)])
            .unwrap();
        assert_eq!(series.flagged_indices(), vec![1005]);
        assert!(series.get(1010).is_some());
        assert!(series.get(1).is_none());
    }

    #[test]
    fn invalid_value_fails_whole_series() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        assert!(matches!(
            session.score_series(&[0.5, f64::NAN, 0.7]),
            Err(ScoringError::InvalidInput { index: 1, .. })
        ));
    }

    #[test]
    fn recalibrate_bumps_generation() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let before = session.snapshot();

        let shifted: Vec<f64> = baseline().iter().map(|x| x * 10.0).collect();
        let after = session.recalibrate(&shifted).unwrap();

        assert_eq!(after.generation, 2);
        assert!(after.params.mu() > before.params.mu());
        // The old snapshot is untouched.
        assert_eq!(before.generation, 1);
        assert_eq!(session.score_series(&[1.0]).unwrap().generation, 2);
    }

    #[test]
    fn failed_recalibration_keeps_current_baseline() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let before = session.snapshot();

        assert!(session.recalibrate(&[1.0]).is_err());
        assert!(session.recalibrate(&[]).is_err());
        assert!(session.recalibrate(&[1.0, -1.0]).is_err());

        let after = session.snapshot();
        assert_eq!(after.generation, before.generation);
        assert_eq!(after.params, before.params);
    }

    #[test]
    fn publish_rejects_unusable_parameters() {
        let session = ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap();
        let zero = BaselineParameters::new(0.0, 0.0).unwrap();
        assert!(session.publish(zero).is_err());
        assert_eq!(session.generation(), 1);

        let ok = BaselineParameters::new(0.0, 1.0).unwrap();
        assert_eq!(session.publish(ok).unwrap().generation, 2);
    }

    #[test]
    fn parallel_and_sequential_sessions_agree() {
        let errors: Vec<f64> = (0..5000).map(|i| f64::from(i % 97) * 0.05).collect();
        let seq_cfg = ScoringConfig {
            parallel: false,
            ..ScoringConfig::default()
        };
        let par_cfg = ScoringConfig {
            parallel: true,
            parallel_min_batch: 1,
            ..ScoringConfig::default()
        };
        let seq = ScoringSession::calibrate(&baseline(), seq_cfg).unwrap();
        let par = ScoringSession::calibrate(&baseline(), par_cfg).unwrap();
        assert_eq!(
            seq.score_series(&errors).unwrap().points,
            par.score_series(&errors).unwrap().points
        );
    }

    #[test]
    fn concurrent_recalibration_never_mixes_generations() {
        let session =
            Arc::new(ScoringSession::calibrate(&baseline(), ScoringConfig::default()).unwrap());
        let errors: Vec<f64> = (0..200).map(|i| f64::from(i) * 0.01).collect();

        std::thread::scope(|scope| {
            let writer = Arc::clone(&session);
            scope.spawn(move || {
                for k in 1..50 {
                    let scaled: Vec<f64> =
                        baseline().iter().map(|x| x * f64::from(k)).collect();
                    writer.recalibrate(&scaled).unwrap();
                }
            });

            for _ in 0..50 {
                let series = session.score_series(&errors).unwrap();
                assert_eq!(series.len(), errors.len());
                // Every point must be consistent with a single published baseline:
                // scores are monotone in the raw error, as they are for one fixed
                // parameter set.
                for pair in series.points.windows(2) {
                    assert!(pair[0].score <= pair[1].score);
                }
            }
        });

        assert_eq!(session.generation(), 50);
    }
}
