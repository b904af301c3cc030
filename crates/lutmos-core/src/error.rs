//! Error types for lutmos-core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown quantity '{name}', expected one of id_w, gmro, ft")]
    InvalidQuantity { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
