use thiserror::Error;

/// Errors raised by the decision engine and its configuration stores.
///
/// None of these are retried internally: aggregation and trade-parameter
/// computation are deterministic, so the caller must change its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Missing or unusable weight configuration. Callers route to the
    /// default strategy instead of aborting.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An input outside its allowed range (price, confidence, weight, score).
    #[error("validation error: {0}")]
    Validation(String),

    /// A write would break the per-(user, pair) weight invariants.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Backing store failure reported by a collaborator.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
