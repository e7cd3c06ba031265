//! Elliptic-curve ElGamal over group points.
//!
//! Encrypts a message that is already a point. Randomized and
//! unauthenticated, so a ciphertext can be rerandomized or mauled by anyone;
//! use [`crate::channel`] when integrity matters.

use std::marker::PhantomData;

use rand::CryptoRng;
use serde::{Deserialize, Serialize};

use crate::group::Group;

/// `(r * Base, M + r * N)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Ciphertext<G: Group> {
    pub ephemeral: G::Point,
    pub masked: G::Point,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ElGamal<G: Group>(PhantomData<G>);

impl<G: Group> ElGamal<G> {
    pub fn encrypt<R: CryptoRng + ?Sized>(
        rng: &mut R,
        message: &G::Point,
        public_key: &G::Point,
    ) -> Ciphertext<G> {
        let blinding = G::random_scalar(rng);
        Ciphertext {
            ephemeral: G::base_mul(&blinding),
            masked: *message + *public_key * blinding,
        }
    }

    pub fn decrypt(private_key: &G::Scalar, ciphertext: &Ciphertext<G>) -> G::Point {
        ciphertext.masked - ciphertext.ephemeral * *private_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Ed25519;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn decrypt_inverts_encrypt() {
        let mut rng = StdRng::seed_from_u64(11);
        let private = Ed25519::random_scalar(&mut rng);
        let public = Ed25519::base_mul(&private);
        let message = Ed25519::base_mul(&Ed25519::random_scalar(&mut rng));

        let ciphertext = ElGamal::<Ed25519>::encrypt(&mut rng, &message, &public);
        assert_ne!(ciphertext.masked, message);
        assert_eq!(ElGamal::<Ed25519>::decrypt(&private, &ciphertext), message);
    }

    #[test]
    fn encryption_is_randomized() {
        let mut rng = StdRng::seed_from_u64(12);
        let public = Ed25519::base_mul(&Ed25519::random_scalar(&mut rng));
        let message = Ed25519::base_point();
        let first = ElGamal::<Ed25519>::encrypt(&mut rng, &message, &public);
        let second = ElGamal::<Ed25519>::encrypt(&mut rng, &message, &public);
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_key_yields_other_point() {
        let mut rng = StdRng::seed_from_u64(13);
        let private = Ed25519::random_scalar(&mut rng);
        let other = Ed25519::random_scalar(&mut rng);
        let message = Ed25519::base_point();
        let ciphertext =
            ElGamal::<Ed25519>::encrypt(&mut rng, &message, &Ed25519::base_mul(&private));
        assert_ne!(ElGamal::<Ed25519>::decrypt(&other, &ciphertext), message);
    }
}
