//! Error types for lutmos-interp.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("at least {required} data points are required, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    #[error("all data points are coincident")]
    DegeneratePoints,

    #[error("singular matrix")]
    SingularMatrix,

    #[error(
        "singular matrix: the monomials of degree {degree} evaluated at the data points \
         do not have full column rank"
    )]
    RankDeficientPolynomial { degree: i32 },

    #[error("invalid dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("non-finite value in interpolation input")]
    NonFiniteInput,

    #[error("epsilon must be specified for the {0} kernel")]
    MissingEpsilon(&'static str),

    #[error("epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
