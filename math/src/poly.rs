//! Dense univariate polynomials over `Z/mZ`.
//!
//! Coefficients are stored lowest degree first and kept in canonical form:
//! trailing zero coefficients are stripped, but at least one coefficient is
//! always present, so the zero polynomial is `[0]` and has degree 0.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{MathError, Result};
use crate::field_element::FieldElement;
use crate::traits::{Inverse, ModPowU64};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Polynomial {
    coefficients: Vec<FieldElement>,
    modulus: BigUint,
}

impl Polynomial {
    /// Build a polynomial from coefficients that all live in `Z/modulus`.
    pub fn new(
        coefficients: Vec<FieldElement>,
        modulus: impl Into<BigUint>,
    ) -> Result<Self> {
        let modulus = modulus.into();
        if modulus.is_zero() {
            return Err(MathError::ZeroModulus);
        }
        for coefficient in &coefficients {
            coefficient.ensure_modulus(&modulus)?;
        }
        Ok(Self::canonical(coefficients, modulus))
    }

    /// Convenience constructor reducing each integer modulo `modulus`.
    pub fn from_u64s(
        coefficients: &[u64],
        modulus: impl Into<BigUint>,
    ) -> Result<Self> {
        let modulus = modulus.into();
        let coefficients = coefficients
            .iter()
            .map(|&c| FieldElement::new(c, modulus.clone()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(coefficients, modulus)
    }

    pub fn zero(modulus: impl Into<BigUint>) -> Result<Self> {
        Self::new(Vec::new(), modulus)
    }

    pub fn one(modulus: impl Into<BigUint>) -> Result<Self> {
        Self::from_u64s(&[1], modulus)
    }

    /// Caller guarantees `modulus > 0` and matching coefficient moduli.
    fn canonical(mut coefficients: Vec<FieldElement>, modulus: BigUint) -> Self {
        while coefficients.last().is_some_and(FieldElement::is_zero) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            coefficients.push(FieldElement::reduced(BigUint::zero(), modulus.clone()));
        }
        Self {
            coefficients,
            modulus,
        }
    }

    pub fn zero_like(&self) -> Self {
        Self::canonical(Vec::new(), self.modulus.clone())
    }

    pub fn one_like(&self) -> Self {
        Self::canonical(
            vec![FieldElement::reduced(BigUint::one(), self.modulus.clone())],
            self.modulus.clone(),
        )
    }

    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coefficients
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Number of coefficients minus one; the zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.len() == 1 && self.coefficients[0].is_zero()
    }

    pub fn leading_coefficient(&self) -> &FieldElement {
        &self.coefficients[self.coefficients.len() - 1]
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
        self.zip_padded(rhs, FieldElement::try_add)
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.zip_padded(rhs, FieldElement::try_sub)
    }

    /// Apply `op` coefficient-wise, padding the shorter operand with zeros.
    fn zip_padded<F>(&self, rhs: &Self, op: F) -> Result<Self>
    where
        F: Fn(&FieldElement, &FieldElement) -> Result<FieldElement>,
    {
        rhs.ensure_modulus(&self.modulus)?;
        let zero = FieldElement::reduced(BigUint::zero(), self.modulus.clone());
        let len = self.coefficients.len().max(rhs.coefficients.len());
        let coefficients = (0..len)
            .map(|i| {
                let a = self.coefficients.get(i).unwrap_or(&zero);
                let b = rhs.coefficients.get(i).unwrap_or(&zero);
                op(a, b)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::canonical(coefficients, self.modulus.clone()))
    }

    /// Schoolbook convolution.
    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        rhs.ensure_modulus(&self.modulus)?;
        let len = self.coefficients.len() + rhs.coefficients.len() - 1;
        let mut product = vec![BigUint::zero(); len];
        for (i, a) in self.coefficients.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coefficients.iter().enumerate() {
                product[i + j] += a.value() * b.value();
            }
        }
        let coefficients = product
            .into_iter()
            .map(|c| FieldElement::reduced(c, self.modulus.clone()))
            .collect();
        Ok(Self::canonical(coefficients, self.modulus.clone()))
    }

    /// Multiply every coefficient by a (possibly negative) integer.
    #[must_use]
    pub fn mul_int(&self, rhs: i64) -> Self {
        let coefficients =
            self.coefficients.iter().map(|c| c.mul_int(rhs)).collect();
        Self::canonical(coefficients, self.modulus.clone())
    }

    /// Multiply every coefficient by a constant of the same ring.
    pub fn scale(&self, factor: &FieldElement) -> Result<Self> {
        let coefficients = self
            .coefficients
            .iter()
            .map(|c| c.try_mul(factor))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::canonical(coefficients, self.modulus.clone()))
    }

    /// Euclidean division: `self = quotient * divisor + remainder` with
    /// `deg(remainder) < deg(divisor)` (or a zero remainder).
    ///
    /// The divisor's leading coefficient is inverted with Fermat's little
    /// theorem, so the coefficient modulus should be prime.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        let (quotient, remainder) = self.long_division(divisor, true)?;
        Ok((quotient.unwrap_or_else(|| self.zero_like()), remainder))
    }

    /// Remainder of [`Self::div_rem`] without building the quotient.
    pub fn rem(&self, divisor: &Self) -> Result<Self> {
        Ok(self.long_division(divisor, false)?.1)
    }

    fn long_division(
        &self,
        divisor: &Self,
        with_quotient: bool,
    ) -> Result<(Option<Self>, Self)> {
        divisor.ensure_modulus(&self.modulus)?;
        if divisor.is_zero() {
            return Err(MathError::ZeroDivision);
        }
        let divisor_len = divisor.coefficients.len();
        if self.coefficients.len() < divisor_len {
            return Ok((with_quotient.then(|| self.zero_like()), self.clone()));
        }

        let lead_inverse = divisor.leading_coefficient().inverse()?;
        let mut remainder = self.coefficients.clone();
        let steps = remainder.len() - divisor_len + 1;
        let mut quotient = with_quotient.then(|| {
            vec![FieldElement::reduced(BigUint::zero(), self.modulus.clone()); steps]
        });

        for shift in (0..steps).rev() {
            let factor = remainder[shift + divisor_len - 1].try_mul(&lead_inverse)?;
            if factor.is_zero() {
                continue;
            }
            for (i, d) in divisor.coefficients.iter().enumerate() {
                remainder[shift + i] =
                    remainder[shift + i].try_sub(&factor.try_mul(d)?)?;
            }
            if let Some(quotient) = quotient.as_mut() {
                quotient[shift] = factor;
            }
        }

        let quotient =
            quotient.map(|q| Self::canonical(q, self.modulus.clone()));
        Ok((quotient, Self::canonical(remainder, self.modulus.clone())))
    }

    /// Horner evaluation at `point`.
    pub fn evaluate(&self, point: &FieldElement) -> Result<FieldElement> {
        point.ensure_modulus(&self.modulus)?;
        self.coefficients
            .iter()
            .rev()
            .try_fold(point.zero_like(), |acc, c| acc.try_mul(point)?.try_add(c))
    }

    /// Order by coefficient count first, then coefficient-wise from the
    /// constant term up.
    pub fn try_cmp(&self, rhs: &Self) -> Result<Ordering> {
        rhs.ensure_modulus(&self.modulus)?;
        let by_len = self.coefficients.len().cmp(&rhs.coefficients.len());
        if by_len != Ordering::Equal {
            return Ok(by_len);
        }
        for (a, b) in self.coefficients.iter().zip(&rhs.coefficients) {
            match a.try_cmp(b)? {
                Ordering::Equal => continue,
                unequal => return Ok(unequal),
            }
        }
        Ok(Ordering::Equal)
    }
}

impl PartialOrd for Polynomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl ModPowU64 for Polynomial {
    /// Binary exponentiation over `Z/m[x]` (no reduction by any modulus
    /// polynomial).
    fn mod_pow_u64(&self, exp: u64) -> Self {
        let mut acc = self.one_like();
        let bit_length = u64::BITS - exp.leading_zeros();
        for i in (0..bit_length).rev() {
            acc = square_or_mul(&acc, &acc);
            if exp & (1 << i) != 0 {
                acc = square_or_mul(&acc, self);
            }
        }
        acc
    }
}

// Both operands share a modulus, so the multiplication cannot fail.
fn square_or_mul(a: &Polynomial, b: &Polynomial) -> Polynomial {
    a.try_mul(b).unwrap_or_else(|_| a.zero_like())
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        let coefficients = self.coefficients.iter().map(|c| -c).collect();
        Polynomial::canonical(coefficients, self.modulus.clone())
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}

impl Polynomial {
    /// `[c0, c1, ...]` without the modulus suffix.
    pub(crate) fn write_coefficients(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.coefficients.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c.value())?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_coefficients(f)?;
        write!(f, " (mod {})", self.modulus)
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec;
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn test_trailing_zeros_are_stripped() {
        let p = poly![1, 2, 0, 0; 7];
        assert_eq!(p.coefficients().len(), 2);
        assert_eq!(p.degree(), 1);

        let zero = poly![0, 0, 7; 7];
        assert!(zero.is_zero());
        assert_eq!(zero.degree(), 0);
        assert_eq!(zero, Polynomial::zero(7u64).unwrap());
        assert_eq!(poly![; 7], zero);
    }

    #[test]
    fn test_mismatched_coefficient_modulus_is_rejected() {
        let c = FieldElement::new(1u64, 5u64).unwrap();
        assert!(matches!(
            Polynomial::new(vec![c], 7u64),
            Err(MathError::ModulusMismatch { .. })
        ));
        assert_eq!(Polynomial::zero(0u64), Err(MathError::ZeroModulus));
    }

    #[test]
    fn test_polynomial_addition_pads_shorter_operand() {
        let sum = poly![1, 2, 3; 7].try_add(&poly![6; 7]).unwrap();
        assert_eq!(sum, poly![0, 2, 3; 7]);

        let difference = poly![1; 7].try_sub(&poly![1, 0, 3; 7]).unwrap();
        assert_eq!(difference, poly![0, 0, 4; 7]);

        let cancelled = poly![1, 2, 3; 7].try_sub(&poly![1, 2, 3; 7]).unwrap();
        assert!(cancelled.is_zero());
    }

    #[test]
    fn test_polynomial_multiplication() {
        // (1 + 2x)(3 + 4x) = 3 + 10x + 8x^2
        let product = poly![1, 2; 11].try_mul(&poly![3, 4; 11]).unwrap();
        assert_eq!(product, poly![3, 10, 8; 11]);
        assert_eq!(product.degree(), 2);

        let by_zero = poly![1, 2; 11].try_mul(&poly![0; 11]).unwrap();
        assert!(by_zero.is_zero());
    }

    #[test]
    fn test_integer_multiplication_and_negation() {
        assert_eq!(poly![1, 2; 7].mul_int(-1), poly![6, 5; 7]);
        assert_eq!(-poly![1, 2; 7], poly![6, 5; 7]);
        assert!(poly![1, 2; 7].mul_int(7).is_zero());
    }

    #[test]
    fn test_division_by_zero_polynomial_fails() {
        let zero = Polynomial::zero(7u64).unwrap();
        assert_eq!(poly![1, 2; 7].div_rem(&zero), Err(MathError::ZeroDivision));
        assert_eq!(poly![1, 2; 7].rem(&zero), Err(MathError::ZeroDivision));
    }

    #[test]
    fn test_exact_division() {
        // x^2 - 1 = (x - 1)(x + 1) over GF(7)
        let (quotient, remainder) =
            poly![6, 0, 1; 7].div_rem(&poly![1, 1; 7]).unwrap();
        assert_eq!(quotient, poly![6, 1; 7]);
        assert!(remainder.is_zero());
    }

    #[test]
    fn test_division_by_higher_degree_returns_dividend() {
        let dividend = poly![3, 1; 7];
        let (quotient, remainder) = dividend.div_rem(&poly![1, 0, 1; 7]).unwrap();
        assert!(quotient.is_zero());
        assert_eq!(remainder, dividend);
        assert_eq!(dividend.rem(&poly![1, 0, 1; 7]).unwrap(), dividend);
    }

    #[test]
    fn test_pow_uses_repeated_multiplication() {
        // (1 + x)^3 = 1 + 3x + 3x^2 + x^3
        let cube = poly![1, 1; 13].mod_pow_u64(3);
        assert_eq!(cube, poly![1, 3, 3, 1; 13]);
        assert_eq!(poly![4, 1; 13].mod_pow_u64(0), poly![1; 13]);
        // Frobenius over GF(2): (1 + x)^2 = 1 + x^2
        assert_eq!(poly![1, 1; 2].mod_pow_u64(2), poly![1, 0, 1; 2]);
    }

    #[test]
    fn test_evaluate_with_horner() {
        // 2 + 3x + x^2 at x = 4 over GF(13): 2 + 12 + 16 = 30 = 4
        let value = poly![2, 3, 1; 13]
            .evaluate(&FieldElement::new(4u64, 13u64).unwrap())
            .unwrap();
        assert_eq!(value, FieldElement::new(4u64, 13u64).unwrap());
    }

    #[test]
    fn test_ordering_by_length_then_lexicographic_from_constant_term() {
        assert!(poly![6, 6; 7] < poly![0, 0, 1; 7]);
        assert!(poly![1, 5; 7] < poly![2, 1; 7]);
        assert!(poly![2, 1; 7] < poly![2, 3; 7]);
        assert_eq!(
            poly![2, 3; 7].try_cmp(&poly![2, 3; 7]).unwrap(),
            Ordering::Equal
        );
        assert!(poly![2, 3; 7].try_cmp(&poly![2, 3; 11]).is_err());
        assert_eq!(poly![2, 3; 7].partial_cmp(&poly![2, 3; 11]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(poly![1, 0, 3; 7].to_string(), "[1, 0, 3] (mod 7)");
    }

    #[proptest]
    fn division_reconstructs_dividend(
        #[strategy(prop::sample::select(vec![2u64, 3, 7, 13, 101]))] modulus: u64,
        #[strategy(vec(0u64..1_000, 1..10))] dividend: Vec<u64>,
        #[strategy(vec(0u64..1_000, 1..6))]
        #[filter(#divisor.iter().any(|&c| c % #modulus != 0))]
        divisor: Vec<u64>,
    ) {
        let a = Polynomial::from_u64s(&dividend, modulus).unwrap();
        let b = Polynomial::from_u64s(&divisor, modulus).unwrap();
        let (q, r) = a.div_rem(&b).unwrap();

        prop_assert!(r.is_zero() || r.degree() < b.degree());
        prop_assert_eq!(q.try_mul(&b).unwrap().try_add(&r).unwrap(), a.clone());
        prop_assert_eq!(a.rem(&b).unwrap(), r);
    }

    #[proptest]
    fn multiplication_degree_is_sum_of_degrees(
        #[strategy(vec(1u64..13, 1..8))] a: Vec<u64>,
        #[strategy(vec(1u64..13, 1..8))] b: Vec<u64>,
    ) {
        let a = Polynomial::from_u64s(&a, 13u64).unwrap();
        let b = Polynomial::from_u64s(&b, 13u64).unwrap();
        prop_assert_eq!(a.try_mul(&b).unwrap().degree(), a.degree() + b.degree());
    }
}
