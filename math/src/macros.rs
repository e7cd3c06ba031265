//! Shorthand constructors for tests and examples.
//!
//! Both macros panic on a zero modulus, so they are meant for literals, not
//! for untrusted input.

/// Build a [`FieldElement`](crate::field_element::FieldElement) from an
/// unsigned value and a modulus.
///
/// ```
/// use math::{fe, FieldElement};
///
/// let a = fe!(10, 7);
/// assert_eq!(a, FieldElement::new(3u64, 7u64).unwrap());
/// ```
#[macro_export]
macro_rules! fe {
    ($value:expr, $modulus:expr) => {
        $crate::field_element::FieldElement::new(($value) as u64, ($modulus) as u64)
            .expect("fe! needs a positive modulus")
    };
}

/// Build a [`Polynomial`](crate::poly::Polynomial) from unsigned
/// coefficients, constant term first, followed by the modulus.
///
/// ```
/// use math::{fe, poly};
///
/// let p = poly![1, 2, 0; 5];
/// assert_eq!(p.coefficients(), &[fe!(1, 5), fe!(2, 5)]);
/// assert!(poly![; 5].is_zero());
/// ```
#[macro_export]
macro_rules! poly {
    ($($coefficient:expr),* ; $modulus:expr) => {
        $crate::poly::Polynomial::from_u64s(&[$(($coefficient) as u64),*], ($modulus) as u64)
            .expect("poly! needs a positive modulus")
    };
}
