//! Threshold key generation over curve25519.
//!
//! - [`group`]: the prime-order group abstraction and its Ed25519 instance.
//! - [`channel`]: authenticated encryption between two key pairs.
//! - [`vss`]: Feldman verifiable secret sharing.
//! - [`dkg`]: the four-round M-of-N key generation.
//! - [`elgamal`]: point encryption.

pub mod channel;
pub mod dkg;
pub mod elgamal;
pub mod group;
pub mod params;
pub mod vss;

pub use channel::{ChannelError, Ecies, SealedBox, SecureChannel};
pub use dkg::{reconstruct_private_key, DkgError, DkgOutput, Player, PlayerState};
pub use group::{Ed25519, Group};
pub use params::DkgParameters;
