//! Feldman verifiable secret sharing.
//!
//! A dealer splits a scalar with a random polynomial of degree `m - 1` and
//! publishes `a_i * Base` for every coefficient, so each recipient can check
//! its share without learning anything beyond it.

pub mod error;

mod feldman;
mod share;

pub use error::{VssError, VssResult};
pub use feldman::FeldmanVss;
pub use share::{CommitmentVector, SecretShare};
