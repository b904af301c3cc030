//! Engine configuration.

use lutmos_interp::RbfConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a [`LutEngine`](crate::LutEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fit settings shared by every bias plane.
    pub rbf: RbfConfig,
    /// Half-width of the window in which a query bias counts as an exact
    /// plane match. Zero means bit-equal.
    pub bias_tolerance: f64,
    /// Reconstructed gmro values closer than this are treated as equal when
    /// interpolating a length inside a bracket.
    pub flat_tolerance: f64,
    /// Fit bias planes in parallel during rebuild.
    pub parallel_rebuild: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rbf: RbfConfig::default(),
            bias_tolerance: 0.0,
            flat_tolerance: 1e-12,
            parallel_rebuild: true,
        }
    }
}

impl EngineConfig {
    /// Set the RBF configuration.
    pub fn with_rbf(mut self, rbf: RbfConfig) -> Self {
        self.rbf = rbf;
        self
    }

    /// Set the exact-match bias tolerance.
    pub fn with_bias_tolerance(mut self, tolerance: f64) -> Self {
        self.bias_tolerance = tolerance;
        self
    }

    /// Set the flat-bracket tolerance.
    pub fn with_flat_tolerance(mut self, tolerance: f64) -> Self {
        self.flat_tolerance = tolerance;
        self
    }

    /// Enable or disable parallel plane fitting.
    pub fn with_parallel_rebuild(mut self, parallel: bool) -> Self {
        self.parallel_rebuild = parallel;
        self
    }
}
