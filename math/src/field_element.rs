use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use num_bigint::BigUint;
use num_traits::One;
use num_traits::Zero;

use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::{MathError, Result};
use crate::traits::{Inverse, ModPowU64};

/// What [`FieldElement::inverse_with`] does when asked to invert zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ZeroInversePolicy {
    /// Fail with [`MathError::ZeroDivision`].
    #[default]
    Reject,
    /// Return the additive identity.
    ReturnZero,
}

/// Residue of an integer modulo `m > 0`.
///
/// The modulus travels with the value, so every binary operation checks that
/// both operands live in the same ring. Primality of the modulus is not
/// checked; [`Inverse`] assumes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldElement {
    value: BigUint,
    modulus: BigUint,
}

impl Serialize for FieldElement {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.value.to_string(), self.modulus.to_string()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (value, modulus) = <(String, String)>::deserialize(deserializer)?;
        let value: BigUint = value.parse().map_err(de::Error::custom)?;
        let modulus: BigUint = modulus.parse().map_err(de::Error::custom)?;
        if value >= modulus {
            return Err(de::Error::custom(format!(
                "non-canonical residue {value} >= {modulus}"
            )));
        }
        Self::new(value, modulus).map_err(de::Error::custom)
    }
}

impl FieldElement {
    /// Reduce `value` modulo `modulus`.
    pub fn new(
        value: impl Into<BigUint>,
        modulus: impl Into<BigUint>,
    ) -> Result<Self> {
        let modulus = modulus.into();
        if modulus.is_zero() {
            return Err(MathError::ZeroModulus);
        }
        Ok(Self::reduced(value.into(), modulus))
    }

    /// Map a signed integer to its representative in `[0, modulus)`.
    pub fn from_i64(value: i64, modulus: impl Into<BigUint>) -> Result<Self> {
        let modulus = modulus.into();
        if modulus.is_zero() {
            return Err(MathError::ZeroModulus);
        }
        Ok(Self::reduced(signed_residue(value, &modulus), modulus))
    }

    /// Caller guarantees `modulus > 0`.
    pub(crate) fn reduced(value: BigUint, modulus: BigUint) -> Self {
        let value = value % &modulus;
        Self { value, modulus }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The additive identity of this element's ring.
    pub fn zero_like(&self) -> Self {
        Self::reduced(BigUint::zero(), self.modulus.clone())
    }

    /// The multiplicative identity of this element's ring.
    pub fn one_like(&self) -> Self {
        Self::reduced(BigUint::one(), self.modulus.clone())
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    pub(crate) fn ensure_modulus(&self, modulus: &BigUint) -> Result<()> {
        if &self.modulus == modulus {
            Ok(())
        } else {
            Err(MathError::ModulusMismatch {
                left: self.modulus.clone(),
                right: modulus.clone(),
            })
        }
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        rhs.ensure_modulus(&self.modulus)?;
        Ok(Self::reduced(&self.value + &rhs.value, self.modulus.clone()))
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        rhs.ensure_modulus(&self.modulus)?;
        // Lift into [modulus, 2 * modulus) so the difference never underflows.
        let lifted = &self.value + &self.modulus;
        Ok(Self::reduced(lifted - &rhs.value, self.modulus.clone()))
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        rhs.ensure_modulus(&self.modulus)?;
        Ok(Self::reduced(&self.value * &rhs.value, self.modulus.clone()))
    }

    /// Multiply by a (possibly negative) integer.
    #[must_use]
    pub fn mul_int(&self, rhs: i64) -> Self {
        let factor = signed_residue(rhs, &self.modulus);
        Self::reduced(&self.value * factor, self.modulus.clone())
    }

    /// Compare residues; elements of different rings are not comparable.
    pub fn try_cmp(&self, rhs: &Self) -> Result<Ordering> {
        rhs.ensure_modulus(&self.modulus)?;
        Ok(self.value.cmp(&rhs.value))
    }

    /// Invert according to `policy`.
    ///
    /// Uses Fermat's little theorem, `x^(m-2) mod m`, which is only the
    /// inverse when `m` is prime.
    pub fn inverse_with(&self, policy: ZeroInversePolicy) -> Result<Self> {
        if self.is_zero() {
            return match policy {
                ZeroInversePolicy::Reject => Err(MathError::ZeroDivision),
                ZeroInversePolicy::ReturnZero => Ok(self.zero_like()),
            };
        }
        // m == 1 has only the zero residue, handled above.
        let exponent = &self.modulus - BigUint::from(2u8);
        Ok(Self {
            value: self.value.modpow(&exponent, &self.modulus),
            modulus: self.modulus.clone(),
        })
    }

    /// Invert, mapping zero to zero instead of failing.
    pub fn inverse_or_zero(&self) -> Self {
        match self.inverse_with(ZeroInversePolicy::ReturnZero) {
            Ok(inverse) => inverse,
            Err(_) => self.zero_like(),
        }
    }
}

/// Residue of `value` in `[0, modulus)`; `modulus` must be positive.
fn signed_residue(value: i64, modulus: &BigUint) -> BigUint {
    let magnitude = BigUint::from(value.unsigned_abs()) % modulus;
    if value < 0 && !magnitude.is_zero() {
        modulus - magnitude
    } else {
        magnitude
    }
}

/// Sort `items` by the residue returned from `key`.
///
/// Every key must share one modulus, otherwise the order is undefined and an
/// error is returned before anything is moved.
pub fn sort_by_residue<T, F>(items: &mut [T], key: F) -> Result<()>
where
    F: Fn(&T) -> &FieldElement,
{
    if let Some(first) = items.first() {
        let modulus = key(first).modulus().clone();
        for item in items.iter() {
            key(item).ensure_modulus(&modulus)?;
        }
    }
    items.sort_by(|a, b| key(a).value.cmp(&key(b).value));
    Ok(())
}

impl PartialOrd for FieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Inverse for FieldElement {
    fn inverse(&self) -> Result<Self> {
        self.inverse_with(ZeroInversePolicy::Reject)
    }
}

impl ModPowU64 for FieldElement {
    fn mod_pow_u64(&self, exp: u64) -> Self {
        let mut acc = self.one_like();
        let bit_length = u64::BITS - exp.leading_zeros();
        for i in (0..bit_length).rev() {
            acc.value = (&acc.value * &acc.value) % &self.modulus;
            if exp & (1 << i) != 0 {
                acc.value = (&acc.value * &self.value) % &self.modulus;
            }
        }
        acc
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement::reduced(
            &self.modulus - &self.value,
            self.modulus.clone(),
        )
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        -&self
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (mod {})", self.value, self.modulus)
    }
}
