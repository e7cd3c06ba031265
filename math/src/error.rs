use num_bigint::BigUint;
use thiserror::Error;

/// Common result type used across this crate.
pub type Result<T, E = MathError> = core::result::Result<T, E>;

/// Top-level error type to keep error management simple for users.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum MathError {
    #[error("modulus must be positive")]
    ZeroModulus,
    #[error("operands live in different fields: mod {left} vs mod {right}")]
    ModulusMismatch { left: BigUint, right: BigUint },
    #[error("operands use different modulus polynomials: {left} vs {right}")]
    ModulusPolynomialMismatch { left: String, right: String },
    #[error("division by zero")]
    ZeroDivision,
    #[error(
        "element is not invertible: the modulus polynomial is reducible or shares a factor with it"
    )]
    NotInvertible,
    #[error("modulus polynomial must have degree >= 1, got {0}")]
    InvalidModulusPolynomial(String),
}
