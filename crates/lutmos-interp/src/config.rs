//! Configuration for RBF fitting.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kernel::Kernel;

/// RBF fit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbfConfig {
    /// Radial basis kernel.
    pub kernel: Kernel,
    /// Shape parameter. `None` uses 1.0 for scale-free kernels and is an
    /// error for the others.
    pub epsilon: Option<f64>,
    /// Total degree of the polynomial tail. `None` picks the kernel default.
    pub degree: Option<i32>,
    /// Value added to the kernel diagonal (0 = exact interpolation).
    pub smoothing: f64,
}

impl Default for RbfConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::ThinPlateSpline,
            epsilon: None,
            degree: None,
            smoothing: 0.0,
        }
    }
}

impl RbfConfig {
    /// Create a configuration for the given kernel.
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            ..Self::default()
        }
    }

    /// Set the shape parameter.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Set the polynomial degree.
    pub fn with_degree(mut self, degree: i32) -> Self {
        self.degree = Some(degree);
        self
    }

    /// Set the smoothing parameter.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Epsilon actually used for fitting.
    pub fn resolved_epsilon(&self) -> Result<f64> {
        let epsilon = match self.epsilon {
            Some(eps) => eps,
            None if self.kernel.is_scale_free() => 1.0,
            None => return Err(Error::MissingEpsilon(self.kernel.name())),
        };
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(Error::InvalidEpsilon(epsilon));
        }
        Ok(epsilon)
    }

    /// Polynomial degree actually used for fitting.
    pub fn resolved_degree(&self) -> i32 {
        let degree = self.degree.unwrap_or_else(|| self.kernel.default_degree());
        // Anything below -1 means "no tail" just like -1.
        degree.max(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_thin_plate_spline() {
        let config = RbfConfig::default();
        assert_eq!(config.kernel, Kernel::ThinPlateSpline);
        assert_eq!(config.resolved_epsilon().unwrap(), 1.0);
        assert_eq!(config.resolved_degree(), 1);
    }

    #[test]
    fn test_shape_kernels_need_epsilon() {
        let config = RbfConfig::new(Kernel::Gaussian);
        assert_eq!(
            config.resolved_epsilon(),
            Err(Error::MissingEpsilon("gaussian"))
        );
        assert_eq!(config.with_epsilon(0.5).resolved_epsilon().unwrap(), 0.5);
    }

    #[test]
    fn test_invalid_epsilon() {
        let config = RbfConfig::default().with_epsilon(0.0);
        assert!(matches!(
            config.resolved_epsilon(),
            Err(Error::InvalidEpsilon(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RbfConfig = serde_json::from_str(r#"{"kernel": "cubic"}"#).unwrap();
        assert_eq!(config.kernel, Kernel::Cubic);
        assert_eq!(config.epsilon, None);
        assert_eq!(config.smoothing, 0.0);
    }
}
