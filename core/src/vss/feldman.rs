use std::marker::PhantomData;

use log::debug;
use rand::CryptoRng;
use zeroize::Zeroizing;

use crate::group::Group;

use super::error::{VssError, VssResult};
use super::share::{CommitmentVector, SecretShare};

/// Feldman's scheme over the group `G`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeldmanVss<G: Group>(PhantomData<G>);

impl<G: Group> FeldmanVss<G> {
    /// Splits `secret` into one share per entry of `indices`, any `threshold`
    /// of which recover it.
    ///
    /// Indices must be nonzero (the share at zero *is* the secret) and
    /// pairwise distinct.
    pub fn generate<R: CryptoRng + ?Sized>(
        rng: &mut R,
        secret: &G::Scalar,
        indices: &[G::Scalar],
        threshold: usize,
    ) -> VssResult<(Vec<SecretShare<G>>, CommitmentVector<G>)> {
        if threshold == 0 || threshold > indices.len() {
            return Err(VssError::InvalidThreshold {
                threshold,
                participants: indices.len(),
            });
        }
        check_indices::<G>(indices)?;
        let zero = G::scalar_from_u64(0);
        if let Some(position) = indices.iter().position(|index| *index == zero) {
            return Err(VssError::ZeroIndex(position));
        }

        let mut coefficients = Zeroizing::new(Vec::with_capacity(threshold));
        coefficients.push(*secret);
        for _ in 1..threshold {
            coefficients.push(G::random_scalar(rng));
        }

        let commitments =
            CommitmentVector::new(coefficients.iter().map(G::base_mul).collect());
        let shares = indices
            .iter()
            .map(|index| SecretShare::new(*index, evaluate::<G>(&coefficients, index)))
            .collect();

        debug!(
            "dealt {} shares with threshold {}",
            indices.len(),
            threshold
        );
        Ok((shares, commitments))
    }

    /// Checks `share * Base == sum(index^k * V_k)`.
    ///
    /// Commitments come from the dealer, so any `V_k` with a small-order
    /// component fails verification outright.
    pub fn verify(share: &SecretShare<G>, commitments: &CommitmentVector<G>) -> bool {
        if !commitments.points().iter().all(G::is_in_main_subgroup) {
            return false;
        }
        G::base_mul(&share.value) == commitments.evaluate(&share.index)
    }

    /// Lagrange interpolation at zero.
    ///
    /// Fewer than `threshold` shares give an unrelated scalar, not an error:
    /// the shares alone do not say how many are needed.
    pub fn recover(shares: &[SecretShare<G>]) -> VssResult<G::Scalar> {
        if shares.is_empty() {
            return Err(VssError::InsufficientShares);
        }
        let indices: Vec<G::Scalar> = shares.iter().map(|share| share.index).collect();
        check_indices::<G>(&indices)?;

        let mut secret = G::scalar_from_u64(0);
        for (i, share) in shares.iter().enumerate() {
            let mut basis = G::scalar_from_u64(1);
            for (j, other) in indices.iter().enumerate() {
                if i == j {
                    continue;
                }
                let denominator = G::invert_scalar(&(*other - share.index))
                    .ok_or(VssError::DuplicateIndex(i.min(j), i.max(j)))?;
                basis *= *other * denominator;
            }
            secret += share.value * basis;
        }
        Ok(secret)
    }
}

fn check_indices<G: Group>(indices: &[G::Scalar]) -> VssResult<()> {
    for (i, index) in indices.iter().enumerate() {
        if let Some(offset) = indices[i + 1..].iter().position(|other| other == index) {
            return Err(VssError::DuplicateIndex(i, i + 1 + offset));
        }
    }
    Ok(())
}

fn evaluate<G: Group>(coefficients: &[G::Scalar], x: &G::Scalar) -> G::Scalar {
    coefficients
        .iter()
        .rev()
        .fold(G::scalar_from_u64(0), |acc, coefficient| acc * *x + *coefficient)
}
