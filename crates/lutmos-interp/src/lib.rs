//! Interpolation primitives for lutmos.
//!
//! This crate provides:
//! - [`RbfInterpolator`], a radial basis function interpolant over scattered
//!   2D points with a low-order polynomial tail
//! - [`Kernel`] and [`RbfConfig`] to choose and tune the basis
//! - [`interp_linear`], edge-clamped piecewise-linear interpolation in 1D
//! - [`Evaluable2D`], the evaluation interface the engine builds on

pub mod config;
pub mod error;
pub mod kernel;
pub mod linear;
pub mod polynomial;
pub mod rbf;

pub use config::RbfConfig;
pub use error::{Error, Result};
pub use kernel::Kernel;
pub use linear::{interp_linear, interp_linear_many};
pub use rbf::{Evaluable2D, RbfInterpolator};
