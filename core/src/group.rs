//! The prime-order group the protocols run in.
//!
//! [`Group`] bundles the scalar and point types together with the handful of
//! operations the VSS and DKG layers need. [`Ed25519`] is the concrete group:
//! the Edwards form of curve25519 with its cofactor of 8.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

use curve25519_dalek::{
    constants::ED25519_BASEPOINT_POINT,
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::Identity,
};
use math::FieldElement;
use num_bigint::BigUint;
use rand::CryptoRng;
use serde::{de::DeserializeOwned, Serialize};
use sha3::{Digest, Keccak256};
use zeroize::{Zeroize, Zeroizing};

/// Scalar and point arithmetic over a group of prime order with a cofactor.
pub trait Group:
    Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static
{
    type Scalar: Copy
        + Debug
        + Eq
        + Send
        + Sync
        + Zeroize
        + Serialize
        + DeserializeOwned
        + Add<Output = Self::Scalar>
        + Sub<Output = Self::Scalar>
        + Mul<Output = Self::Scalar>
        + Neg<Output = Self::Scalar>
        + AddAssign
        + MulAssign;

    type Point: Copy
        + Debug
        + Eq
        + Send
        + Sync
        + Zeroize
        + Serialize
        + DeserializeOwned
        + Add<Output = Self::Point>
        + Sub<Output = Self::Point>
        + Neg<Output = Self::Point>
        + AddAssign
        + Mul<Self::Scalar, Output = Self::Point>;

    /// Index of the prime-order subgroup in the full curve group.
    const COFACTOR: u64;

    /// Width of the canonical point encoding.
    const POINT_BYTES: usize;

    fn base_point() -> Self::Point;

    fn identity() -> Self::Point;

    fn scalar_from_u64(value: u64) -> Self::Scalar;

    /// Samples a uniformly random scalar.
    fn random_scalar<R: CryptoRng + ?Sized>(rng: &mut R) -> Self::Scalar;

    /// Multiplicative inverse; `None` for zero.
    fn invert_scalar(scalar: &Self::Scalar) -> Option<Self::Scalar>;

    fn point_to_bytes(point: &Self::Point) -> Vec<u8>;

    /// Decodes a canonical point encoding. Non-canonical encodings and
    /// off-curve inputs yield `None`.
    fn point_from_bytes(bytes: &[u8]) -> Option<Self::Point>;

    /// Hashes an ordered sequence of byte strings to a scalar.
    fn hash_to_scalar(inputs: &[&[u8]]) -> Self::Scalar;

    /// Multiplies by the prime subgroup order and compares with the identity.
    ///
    /// Every externally supplied point must pass this check before use,
    /// otherwise a point with a small-order component can leak information
    /// about the secret it is multiplied with.
    fn is_in_main_subgroup(point: &Self::Point) -> bool;

    /// The secondary coordinate of the point as a base-field element, used to
    /// order points deterministically.
    fn canonical_coordinate(point: &Self::Point) -> math::Result<FieldElement>;

    fn base_mul(scalar: &Self::Scalar) -> Self::Point {
        Self::base_point() * *scalar
    }
}

/// The twisted Edwards form of curve25519, as used by Ed25519 and Monero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Ed25519;

impl Ed25519 {
    /// 2^255 - 19.
    pub fn field_modulus() -> BigUint {
        (BigUint::from(1u8) << 255u32) - BigUint::from(19u8)
    }
}

impl Group for Ed25519 {
    type Scalar = Scalar;
    type Point = EdwardsPoint;

    const COFACTOR: u64 = 8;
    const POINT_BYTES: usize = 32;

    fn base_point() -> EdwardsPoint {
        ED25519_BASEPOINT_POINT
    }

    fn identity() -> EdwardsPoint {
        EdwardsPoint::identity()
    }

    fn scalar_from_u64(value: u64) -> Scalar {
        Scalar::from(value)
    }

    fn random_scalar<R: CryptoRng + ?Sized>(rng: &mut R) -> Scalar {
        let mut wide = Zeroizing::new([0u8; 64]);
        rng.fill_bytes(&mut wide[..]);
        Scalar::from_bytes_mod_order_wide(&wide)
    }

    fn invert_scalar(scalar: &Scalar) -> Option<Scalar> {
        if *scalar == Scalar::ZERO {
            return None;
        }
        Some(scalar.invert())
    }

    fn point_to_bytes(point: &EdwardsPoint) -> Vec<u8> {
        point.compress().to_bytes().to_vec()
    }

    fn point_from_bytes(bytes: &[u8]) -> Option<EdwardsPoint> {
        let compressed = CompressedEdwardsY::from_slice(bytes).ok()?;
        let point = compressed.decompress()?;
        // decompress accepts y >= p and the "negative zero" x encoding
        if point.compress() != compressed {
            return None;
        }
        Some(point)
    }

    fn hash_to_scalar(inputs: &[&[u8]]) -> Scalar {
        let mut hasher = Keccak256::new();
        for input in inputs {
            hasher.update((input.len() as u64).to_le_bytes());
            hasher.update(input);
        }
        Scalar::from_bytes_mod_order(hasher.finalize().into())
    }

    fn is_in_main_subgroup(point: &EdwardsPoint) -> bool {
        point.is_torsion_free()
    }

    fn canonical_coordinate(point: &EdwardsPoint) -> math::Result<FieldElement> {
        let mut encoded = point.compress().to_bytes();
        // top bit carries the sign of x
        encoded[31] &= 0x7f;
        FieldElement::new(BigUint::from_bytes_le(&encoded), Self::field_modulus())
    }
}
