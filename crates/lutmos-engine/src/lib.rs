//! gm/Id lookup-table engine.
//!
//! Device sweeps are recorded per quantity (Id/W, gmro, ft) and per bias
//! plane. [`LutEngine::rebuild`] fits one scattered-data interpolant per plane
//! over (gm/Id, length); queries then work in two stages:
//!
//! - forward: evaluate the planes next to the query bias and blend linearly
//!   between them ([`blend`], [`predict`])
//! - inverse: reconstruct gmro against length on the nearest plane and search
//!   it for the measured value ([`invert`])

pub mod blend;
pub mod config;
pub mod engine;
pub mod error;
pub mod invert;
pub mod predict;
pub mod store;

pub use blend::{select_planes, CrossPlaneEvaluator, PlaneSelection};
pub use config::EngineConfig;
pub use engine::LutEngine;
pub use error::{Error, ErrorKind, Result};
pub use invert::{EstimateMethod, EstimateMode, LengthAnswer, LengthEstimate};
pub use predict::{DeviceFigures, Prediction};
pub use store::{BiasPlane, BiasPlaneStore, PlaneStore};
