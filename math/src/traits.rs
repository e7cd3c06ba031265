use crate::error::Result;

/// Square-and-multiply exponentiation by a non-negative integer.
pub trait ModPowU64 {
    #[must_use]
    fn mod_pow_u64(&self, exp: u64) -> Self;
}

/// Multiplicative inversion for the algebra types in this crate.
///
/// Inverting the additive identity is an error; see
/// [`FieldElement::inverse_with`](crate::field_element::FieldElement::inverse_with)
/// for the opt-in policy that maps zero to zero instead.
pub trait Inverse
where
    Self: Sized,
{
    fn inverse(&self) -> Result<Self>;
}
