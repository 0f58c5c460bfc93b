use thiserror::Error;

/// Errors surfaced to callers of `resolve`.
///
/// Per-layer failures are recovered internally by trying the next
/// layer; only total exhaustion or a safety block reaches the caller.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("empty or invalid utterance")]
    EmptyUtterance,

    #[error("no matching command found for {utterance:?}")]
    NoMatch { utterance: String },

    #[error("missing required slot {slot:?} for intent {intent:?}")]
    MissingRequiredSlot { intent: String, slot: String },

    #[error("unsafe command blocked: {reason}")]
    UnsafeCommand { reason: String },

    #[error("catalog error: {0}")]
    Catalog(String),
}

/// Convenience alias for resolution results.
pub type ResolveResult<T> = Result<T, ResolveError>;
