//! Exact modular arithmetic: residues modulo `m`, dense polynomials over
//! them, and field extensions built from a modulus polynomial.
//!
//! Everything here is a plain value type. Binary operations return
//! [`Result`] and fail with [`MathError::ModulusMismatch`] (or
//! [`MathError::ModulusPolynomialMismatch`]) when the operands do not live in
//! the same structure.

#[macro_use]
mod macros;

pub mod error;
pub mod extension_field;
pub mod field_element;
pub mod poly;
pub mod prelude;
pub mod traits;

pub use crate::{
    error::{MathError, Result},
    extension_field::ExtensionFieldElement,
    field_element::{sort_by_residue, FieldElement, ZeroInversePolicy},
    poly::Polynomial,
};
