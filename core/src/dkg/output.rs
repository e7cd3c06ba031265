use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::group::Group;

use super::combination::Combination;
use super::error::{DkgError, DkgResult};

/// What one participant keeps after the key generation.
pub struct DkgOutput<G: Group> {
    id: u32,
    combinations: Vec<Combination>,
    share_private_keys: BTreeMap<Combination, G::Scalar>,
    aggregate_public_key: G::Point,
}

impl<G: Group> DkgOutput<G> {
    pub(crate) fn new(
        id: u32,
        combinations: Vec<Combination>,
        share_private_keys: BTreeMap<Combination, G::Scalar>,
        aggregate_public_key: G::Point,
    ) -> Self {
        Self {
            id,
            combinations,
            share_private_keys,
            aggregate_public_key,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// All combinations of the run, not only the ones held here.
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    /// Weighted private keys of the combinations this participant belongs to.
    pub fn share_private_keys(&self) -> &BTreeMap<Combination, G::Scalar> {
        &self.share_private_keys
    }

    pub fn share_private_key(&self, combination: &Combination) -> Option<&G::Scalar> {
        self.share_private_keys.get(combination)
    }

    /// The multisig public key, identical for every honest participant.
    pub fn aggregate_public_key(&self) -> &G::Point {
        &self.aggregate_public_key
    }
}

impl<G: Group> fmt::Debug for DkgOutput<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DkgOutput")
            .field("id", &self.id)
            .field("combinations", &self.combinations.len())
            .field("held", &self.share_private_keys.keys().collect::<Vec<_>>())
            .field("aggregate_public_key", &self.aggregate_public_key)
            .finish()
    }
}

impl<G: Group> Drop for DkgOutput<G> {
    fn drop(&mut self) {
        for share in self.share_private_keys.values_mut() {
            share.zeroize();
        }
    }
}

/// Rebuilds the full private key behind the aggregate public key.
///
/// Signers are taken in priority order: each contributes its weighted keys
/// for the combinations no earlier signer has claimed. Every combination must
/// end up claimed exactly once, which holds for any M distinct participants.
///
/// This collapses the threshold into a single secret and is meant for
/// recovery and testing, not for signing.
pub fn reconstruct_private_key<G: Group>(
    signers: &[&DkgOutput<G>],
) -> DkgResult<Zeroizing<G::Scalar>> {
    let Some(first) = signers.first() else {
        return Err(DkgError::NoSigners);
    };
    if signers.iter().any(|signer| {
        signer.combinations != first.combinations
            || signer.aggregate_public_key != first.aggregate_public_key
    }) {
        return Err(DkgError::InconsistentOutputs);
    }

    let mut claimed = BTreeSet::new();
    let mut key = Zeroizing::new(G::scalar_from_u64(0));
    for signer in signers {
        for (combination, share) in &signer.share_private_keys {
            if claimed.insert(combination) {
                *key += *share;
            }
        }
        debug!(
            "signer {} applied, {} of {} combinations claimed",
            signer.id,
            claimed.len(),
            first.combinations.len()
        );
    }

    let total = first.combinations.len();
    if claimed.len() != total {
        return Err(DkgError::IncompleteCoverage {
            unclaimed: total - claimed.len(),
            total,
        });
    }
    if G::base_mul(&key) != first.aggregate_public_key {
        return Err(DkgError::ReconstructionMismatch);
    }
    Ok(key)
}
