//! Finite fields of non-prime order, `GF(l)[x] / (p)`.
//!
//! Irreducibility of `p` is not checked. A reducible modulus still gives a
//! ring in which addition and multiplication work; it shows up as
//! [`MathError::NotInvertible`] once a zero divisor is inverted.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use num_bigint::BigUint;

use crate::error::{MathError, Result};
use crate::field_element::FieldElement;
use crate::poly::Polynomial;
use crate::traits::{Inverse, ModPowU64};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtensionFieldElement {
    value: Polynomial,
    modulus: Polynomial,
}

impl ExtensionFieldElement {
    /// Reduce `value` modulo the modulus polynomial.
    pub fn new(value: Polynomial, modulus: Polynomial) -> Result<Self> {
        value.ensure_modulus(modulus.modulus())?;
        if modulus.degree() == 0 {
            return Err(MathError::InvalidModulusPolynomial(modulus.to_string()));
        }
        let value = value.rem(&modulus)?;
        Ok(Self { value, modulus })
    }

    pub fn value(&self) -> &Polynomial {
        &self.value
    }

    pub fn modulus(&self) -> &Polynomial {
        &self.modulus
    }

    /// Order of the base field.
    pub fn base_modulus(&self) -> &BigUint {
        self.modulus.modulus()
    }

    pub fn zero_like(&self) -> Self {
        Self {
            value: self.value.zero_like(),
            modulus: self.modulus.clone(),
        }
    }

    pub fn one_like(&self) -> Self {
        Self {
            value: self.value.one_like(),
            modulus: self.modulus.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn ensure_same_field(&self, rhs: &Self) -> Result<()> {
        if self.modulus == rhs.modulus {
            Ok(())
        } else {
            Err(MathError::ModulusPolynomialMismatch {
                left: self.modulus.to_string(),
                right: rhs.modulus.to_string(),
            })
        }
    }

    fn with_value(&self, value: Polynomial) -> Result<Self> {
        Self::new(value, self.modulus.clone())
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.ensure_same_field(rhs)?;
        self.with_value(self.value.try_add(&rhs.value)?)
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.ensure_same_field(rhs)?;
        self.with_value(self.value.try_sub(&rhs.value)?)
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.ensure_same_field(rhs)?;
        self.with_value(self.value.try_mul(&rhs.value)?)
    }

    /// Multiply by a polynomial over the base field, reducing afterwards.
    pub fn mul_poly(&self, rhs: &Polynomial) -> Result<Self> {
        self.with_value(self.value.try_mul(rhs)?)
    }

    #[must_use]
    pub fn mul_int(&self, rhs: i64) -> Self {
        Self {
            value: self.value.mul_int(rhs),
            modulus: self.modulus.clone(),
        }
    }

    /// Compare representatives with [`Polynomial::try_cmp`].
    pub fn try_cmp(&self, rhs: &Self) -> Result<Ordering> {
        self.ensure_same_field(rhs)?;
        self.value.try_cmp(&rhs.value)
    }
}

impl Inverse for ExtensionFieldElement {
    /// Extended Euclidean algorithm on `(p, x)`, tracking only the Bézout
    /// coefficient of `x`.
    fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(MathError::ZeroDivision);
        }

        let mut t = self.value.zero_like();
        let mut new_t = self.value.one_like();
        let mut r = self.modulus.clone();
        let mut new_r = self.value.clone();

        while !new_r.is_zero() {
            let (quotient, remainder) = r.div_rem(&new_r)?;
            r = std::mem::replace(&mut new_r, remainder);
            let next_t = t.try_sub(&quotient.try_mul(&new_t)?)?;
            t = std::mem::replace(&mut new_t, next_t);
        }

        if r.degree() > 0 {
            return Err(MathError::NotInvertible);
        }

        // Over GF(2) the gcd is already 1.
        let t = if *self.base_modulus() == BigUint::from(2u8) {
            t
        } else {
            t.scale(&r.coefficients()[0].inverse()?)?
        };
        self.with_value(t)
    }
}

impl ModPowU64 for ExtensionFieldElement {
    fn mod_pow_u64(&self, exp: u64) -> Self {
        let mut acc = self.one_like();
        let bit_length = u64::BITS - exp.leading_zeros();
        for i in (0..bit_length).rev() {
            acc = mul_reduced(&acc, &acc);
            if exp & (1 << i) != 0 {
                acc = mul_reduced(&acc, self);
            }
        }
        acc
    }
}

// Operands share a field by construction, so the product always exists.
fn mul_reduced(
    a: &ExtensionFieldElement,
    b: &ExtensionFieldElement,
) -> ExtensionFieldElement {
    a.try_mul(b).unwrap_or_else(|_| a.zero_like())
}

impl PartialOrd for ExtensionFieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Neg for &ExtensionFieldElement {
    type Output = ExtensionFieldElement;

    fn neg(self) -> ExtensionFieldElement {
        ExtensionFieldElement {
            value: -&self.value,
            modulus: self.modulus.clone(),
        }
    }
}

impl Neg for ExtensionFieldElement {
    type Output = ExtensionFieldElement;

    fn neg(self) -> ExtensionFieldElement {
        -&self
    }
}

impl fmt::Display for ExtensionFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.write_coefficients(f)?;
        write!(f, " (mod {})", self.modulus)
    }
}

impl From<ExtensionFieldElement> for Polynomial {
    fn from(element: ExtensionFieldElement) -> Self {
        element.value
    }
}

/// Lift a base-field element into the extension defined by `modulus`.
pub fn embed(
    element: &FieldElement,
    modulus: &Polynomial,
) -> Result<ExtensionFieldElement> {
    let value = Polynomial::new(vec![element.clone()], element.modulus().clone())?;
    ExtensionFieldElement::new(value, modulus.clone())
}
