use thiserror::Error;

use crate::store::StoreError;

/// Domain errors surfaced by the lifecycle operations.
///
/// Every precondition is checked before the first write of an operation, so a
/// returned error means no mutation happened. Nothing here is recovered
/// internally; the calling layer translates these into user-facing messages.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The referenced match, set, or point does not exist (or the caller has
    /// no access to it; the two are indistinguishable on purpose).
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not legal in the current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed input rejected at the boundary, before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persistence collaborator failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound(what.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        EngineError::InvalidState(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
