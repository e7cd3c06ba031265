use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::group::Group;

/// One point `(index, f(index))` on the dealer's secret polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SecretShare<G: Group> {
    pub index: G::Scalar,
    pub value: G::Scalar,
}

impl<G: Group> SecretShare<G> {
    pub fn new(index: G::Scalar, value: G::Scalar) -> Self {
        Self { index, value }
    }
}

impl<G: Group> Drop for SecretShare<G> {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// Commitments `a_k * Base` to the coefficients of the sharing polynomial,
/// constant term first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CommitmentVector<G: Group>(Vec<G::Point>);

impl<G: Group> CommitmentVector<G> {
    pub fn new(points: Vec<G::Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[G::Point] {
        &self.0
    }

    /// Number of shares needed to recover the secret.
    pub fn threshold(&self) -> usize {
        self.0.len()
    }

    /// `secret * Base`.
    pub fn public_secret(&self) -> Option<G::Point> {
        self.0.first().copied()
    }

    /// `f(index) * Base`, evaluated in the exponent by Horner's rule.
    pub fn evaluate(&self, index: &G::Scalar) -> G::Point {
        self.0
            .iter()
            .rev()
            .fold(G::identity(), |acc, commitment| acc * *index + *commitment)
    }
}
