//! Error types for lutmos-loader.

use std::path::PathBuf;

use lutmos_core::Quantity;
use thiserror::Error;

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading sweep tables.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed manifest.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A schema column is absent from the header row.
    #[error("column '{column}' not found in headers {headers:?}")]
    MissingColumn { column: String, headers: Vec<String> },

    /// Column discovery found no value column for the quantity.
    #[error("could not find a {quantity} column in headers {headers:?}")]
    UndiscoverableColumn {
        quantity: Quantity,
        headers: Vec<String>,
    },

    /// A cell is neither empty, NaN nor a number.
    #[error("line {line}, column '{column}': '{text}' is not a number")]
    BadNumber {
        line: u64,
        column: String,
        text: String,
    },

    /// The engine rejected the loaded data.
    #[error(transparent)]
    Engine(#[from] lutmos_engine::Error),
}
