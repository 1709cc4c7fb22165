use thiserror::Error;

pub type Result<T> = std::result::Result<T, JitError>;

/// Failures the scheduling core can produce. `InvalidBatchCount` and
/// `LengthMismatch` are precondition failures that should be unreachable
/// once the service layer has validated the request.
#[derive(Debug, Error)]
pub enum JitError {
    #[error("invalid batch count: {0} (a problem needs at least one batch)")]
    InvalidBatchCount(usize),

    #[error("length mismatch: expected {expected} items, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("solver failed: {0}")]
    SolveFailed(String),
}
