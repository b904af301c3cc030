//! Loading sweep tables into a lutmos engine.
//!
//! Sweeps are CSV files with a channel length column, a gm/Id column and one
//! value column. [`ColumnSchema`] names those columns, [`read_rows`] turns a
//! CSV into [`SampleRow`](lutmos_core::SampleRow)s, and a [`Manifest`] lists
//! the files of every bias plane so a whole table can be built in one call:
//!
//! ```no_run
//! use lutmos_loader::Manifest;
//!
//! let engine = Manifest::from_path("nmos/manifest.json")?.into_engine()?;
//! println!("lengths: {:?}", engine.lengths());
//! # Ok::<(), lutmos_loader::Error>(())
//! ```

pub mod error;
pub mod manifest;
pub mod reader;
pub mod schema;

pub use error::{Error, Result};
pub use manifest::{load_plane, load_plane_with, Manifest, PlaneFiles};
pub use reader::{read_file, read_rows, read_rows_discovering};
pub use schema::{ColumnPolicy, ColumnSchema};
