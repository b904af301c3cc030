//! # lutmos
//!
//! gm/Id lookup tables for analog transistor sizing.
//!
//! lutmos turns device simulation sweeps into two queries:
//! - forward prediction of Id/W, gmro and ft at a (gm/Id, VDS, length) point
//! - inverse estimation of the channel length behind a measured gmro
//!
//! Each quantity is tabulated on a few bias planes. Inside a plane a radial
//! basis function interpolant covers the scattered (gm/Id, length) samples;
//! between planes values are blended linearly.
//!
//! ## Quick Start
//!
//! ```rust
//! use lutmos::prelude::*;
//!
//! let mut lut = LutEngine::new();
//! for bias in [0.2, 0.4] {
//!     let rows: Vec<SampleRow> = [180.0, 360.0, 540.0]
//!         .iter()
//!         .flat_map(|&l| [5.0, 10.0, 15.0].map(|g| SampleRow::new(g, l, g + l / 18.0 + bias)))
//!         .collect();
//!     lut.record(Quantity::Gmro, bias, rows).unwrap();
//! }
//! lut.rebuild().unwrap();
//!
//! let gmro = lut.predict(Quantity::Gmro, 10.0, 0.3, 360.0).unwrap();
//! assert!((gmro - 30.3).abs() < 1e-6);
//!
//! let length = lut
//!     .estimate_length(10.0, 25.0, 0.2, EstimateMode::Discrete)
//!     .unwrap();
//! assert_eq!(length, LengthAnswer::Discrete(360));
//! ```
//!
//! ## Loading sweeps from disk
//!
//! ```rust,ignore
//! use lutmos::prelude::*;
//!
//! let lut = Manifest::from_path("nmos/manifest.json")?.into_engine()?;
//! let figures = lut.predict_all(10.0, 0.4, 720.0)?;
//! println!("Id/W = {}, gmro = {}, ft = {}", figures.id_w, figures.gmro, figures.ft);
//! ```

// Re-export member crates
pub use lutmos_core as core;
pub use lutmos_engine as engine;
pub use lutmos_interp as interp;
pub use lutmos_loader as loader;

// ============================================================================
// Convenient re-exports from lutmos_core
// ============================================================================

pub use lutmos_core::{Error as CoreError, Quantity, SampleRow, SampleTable};

// ============================================================================
// Convenient re-exports from lutmos_interp
// ============================================================================

pub use lutmos_interp::{
    interp_linear, Error as InterpError, Evaluable2D, Kernel, RbfConfig, RbfInterpolator,
};

// ============================================================================
// Convenient re-exports from lutmos_engine
// ============================================================================

pub use lutmos_engine::{
    DeviceFigures, EngineConfig, Error, ErrorKind, EstimateMethod, EstimateMode, LengthAnswer,
    LengthEstimate, LutEngine, PlaneSelection, Prediction, Result,
};

// ============================================================================
// Convenient re-exports from lutmos_loader
// ============================================================================

pub use lutmos_loader::{ColumnPolicy, ColumnSchema, Error as LoadError, Manifest, PlaneFiles};

/// Prelude module for convenient imports.
///
/// ```rust
/// use lutmos::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DeviceFigures, EngineConfig, ErrorKind, EstimateMode, LengthAnswer, LutEngine, Quantity,
        SampleRow,
    };

    pub use crate::{Kernel, RbfConfig};

    pub use crate::{ColumnSchema, Manifest, PlaneFiles};
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let config = EngineConfig::default().with_rbf(RbfConfig::new(Kernel::Cubic));
        let lut = LutEngine::with_config(config);
        assert!(!lut.is_built());
        assert_eq!(Quantity::ALL.len(), 3);
    }

    #[test]
    fn test_interp_reexport() {
        let y = interp_linear(1.5, &[1.0, 2.0], &[10.0, 20.0]).unwrap();
        assert_relative_eq!(y, 15.0);
    }

    #[test]
    fn test_error_kind_reexport() {
        let lut = LutEngine::new();
        let err = lut.predict_by_name("beta", 10.0, 0.4, 100.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuantity);
    }
}
