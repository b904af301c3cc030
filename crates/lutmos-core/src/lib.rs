//! Core data model for lutmos.
//!
//! This crate provides the types shared by every other lutmos crate:
//! - [`Quantity`], the closed set of device figures held in a lookup table
//! - [`SampleRow`] and [`SampleTable`], the normalized sweep samples for one
//!   quantity at one bias

pub mod error;
pub mod quantity;
pub mod sample;

pub use error::{Error, Result};
pub use quantity::Quantity;
pub use sample::{SampleRow, SampleTable};
