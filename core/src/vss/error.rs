use thiserror::Error;

/// Result type specialized for VSS operations.
pub type VssResult<T> = Result<T, VssError>;

/// Errors originating from the verifiable secret sharing module.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VssError {
    #[error("invalid threshold: {threshold} of {participants} shares")]
    InvalidThreshold {
        threshold: usize,
        participants: usize,
    },
    #[error("share index must be nonzero (position {0})")]
    ZeroIndex(usize),
    #[error("share index repeated at positions {0} and {1}")]
    DuplicateIndex(usize, usize),
    #[error("need at least one share to recover")]
    InsufficientShares,
}
