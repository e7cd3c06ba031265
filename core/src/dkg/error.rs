use math::MathError;
use thiserror::Error;

use crate::channel::ChannelError;
use crate::params::InvalidParameters;

use super::combination::Combination;
use super::player::PlayerState;

/// Result type specialized for key generation.
pub type DkgResult<T> = Result<T, DkgError>;

/// Errors that can arise while running or finishing the key generation.
///
/// Every variant that names a `sender` blames that participant's message;
/// the message was rejected as a whole and nothing from it was applied.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DkgError {
    #[error(transparent)]
    InvalidParameters(#[from] InvalidParameters),
    #[error("participant id must be nonzero")]
    ZeroParticipantId,
    #[error("{operation} is not allowed in state {state:?}")]
    UnexpectedState {
        operation: &'static str,
        state: PlayerState,
    },
    #[error("round {round} is incomplete: {received} of {expected} peers delivered")]
    IncompleteRound {
        round: u8,
        received: usize,
        expected: usize,
    },
    #[error("participant {0} cannot send to itself")]
    SelfMessage(u32),
    #[error("unknown participant {0}")]
    UnknownParticipant(u32),
    #[error("participant {0} already delivered a different message this round")]
    DuplicateMessage(u32),
    #[error("message for participant {receiver} delivered to participant {id}")]
    MisaddressedMessage { receiver: u32, id: u32 },
    #[error("participant {sender} sent a point outside the prime-order subgroup")]
    InvalidPoint { sender: u32 },
    #[error("combination {combination} from participant {sender} is not shared with it")]
    UnknownCombination {
        combination: Combination,
        sender: u32,
    },
    #[error("participant {sender} covered {received} of its {expected} combinations")]
    IncompleteMessage {
        sender: u32,
        received: usize,
        expected: usize,
    },
    #[error("public key for {combination} from participant {sender} conflicts with an earlier one")]
    ConsistencyError {
        combination: Combination,
        sender: u32,
    },
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Math(#[from] MathError),
    #[error("no signers given")]
    NoSigners,
    #[error("signers disagree on the combination set or the aggregate key")]
    InconsistentOutputs,
    #[error("{unclaimed} of {total} combinations are not held by any signer")]
    IncompleteCoverage { unclaimed: usize, total: usize },
    #[error("reconstructed key does not match the aggregate public key")]
    ReconstructionMismatch,
}
