pub use num_bigint::BigUint;

pub use crate::error::{MathError, Result};
pub use crate::extension_field::ExtensionFieldElement;
pub use crate::field_element::{FieldElement, ZeroInversePolicy};
pub use crate::poly::Polynomial;
pub use crate::traits::{Inverse, ModPowU64};
pub use crate::{fe, poly};
