use thiserror::Error;

/// Errors from baseline fitting, scoring, and detection.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid error value at index {index}: {value} (must be finite and >= 0)")]
    InvalidInput { index: usize, value: f64 },

    #[error("degenerate baseline: sigma {sigma} is not usable for scoring")]
    DegenerateBaseline { sigma: f64 },

    #[error("baseline location is not finite: {mu}")]
    InvalidLocation { mu: f64 },

    #[error("baseline sample is empty")]
    EmptyBaseline,

    #[error("threshold out of range: {0} (must be in the open interval (0, 1))")]
    InvalidThreshold(f64),

    #[error("epsilon mismatch: parameters fitted with {found}, scorer uses {expected}")]
    EpsilonMismatch { expected: f64, found: f64 },

    #[error("unsupported baseline record format version: {0}")]
    UnsupportedFormat(u32),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("invalid simulation distribution: {0}")]
    InvalidDistribution(String),

    #[error("lock acquisition failed")]
    LockError,
}

impl From<std::io::Error> for ScoringError {
    fn from(e: std::io::Error) -> Self {
        ScoringError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(e: serde_json::Error) -> Self {
        ScoringError::Persistence(format!("json: {}", e))
    }
}

impl ScoringError {
    /// Whether the error points at a baseline that cannot be used for scoring,
    /// as opposed to a bad individual input value.
    pub fn is_baseline_error(&self) -> bool {
        matches!(
            self,
            ScoringError::DegenerateBaseline { .. }
                | ScoringError::InvalidLocation { .. }
                | ScoringError::EmptyBaseline
                | ScoringError::EpsilonMismatch { .. }
        )
    }
}

/// Convenience type alias for scoring results.
pub type ScoringResult<T> = Result<T, ScoringError>;
