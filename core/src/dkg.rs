//! Distributed generation of an M-of-N key.
//!
//! The participants never form a sharing polynomial. Instead every set of
//! `N - M + 1` participants (a [`Combination`]) derives its own key pair from
//! pairwise Diffie-Hellman contributions, and the final public key is a
//! weighted sum over all combinations. Any M participants together hold every
//! combination's private key; M - 1 participants always miss one.

pub mod error;

mod combination;
mod message;
mod output;
mod player;

pub use combination::{Combination, CombinationError};
pub use error::{DkgError, DkgResult};
pub use message::{Round1Message, Round2Message, Round3Message};
pub use output::{reconstruct_private_key, DkgOutput};
pub use player::{Player, PlayerState};
