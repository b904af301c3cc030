//! Error types for lutmos-engine.

use lutmos_core::Quantity;
use thiserror::Error;

/// Coarse classification of engine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unknown quantity name was passed to a query.
    InvalidQuantity,
    /// A query was issued before the engine was built.
    NotBuilt,
    /// The loaded data is insufficient for the request.
    Data,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown quantity '{name}', expected one of id_w, gmro, ft")]
    InvalidQuantity { name: String },

    #[error("lookup table not built: {0}")]
    NotBuilt(String),

    #[error("no data recorded for quantity '{0}'")]
    QuantityNotLoaded(Quantity),

    #[error("gmro data not available; record gmro tables and rebuild first")]
    NoGmroData,

    #[error("no gmro samples at bias {bias} for any tabulated length")]
    NoSamplesAtPlane { bias: f64 },

    #[error("invalid bias value: {0}")]
    InvalidBias(f64),

    #[error("failed to fit {quantity} plane at bias {bias}: {source}")]
    PlaneFit {
        quantity: Quantity,
        bias: f64,
        #[source]
        source: lutmos_interp::Error,
    },

    #[error("interpolation error: {0}")]
    Interp(#[from] lutmos_interp::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidQuantity { .. } => ErrorKind::InvalidQuantity,
            Error::NotBuilt(_) => ErrorKind::NotBuilt,
            Error::QuantityNotLoaded(_)
            | Error::NoGmroData
            | Error::NoSamplesAtPlane { .. }
            | Error::InvalidBias(_)
            | Error::PlaneFit { .. }
            | Error::Interp(_) => ErrorKind::Data,
        }
    }
}

impl From<lutmos_core::Error> for Error {
    fn from(err: lutmos_core::Error) -> Self {
        match err {
            lutmos_core::Error::InvalidQuantity { name } => Error::InvalidQuantity { name },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
