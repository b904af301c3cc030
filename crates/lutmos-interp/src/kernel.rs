//! Radial basis kernels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Radial basis function kernel, evaluated at `r = epsilon * distance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// `-r`
    Linear,
    /// `r^2 ln(r)`
    #[default]
    ThinPlateSpline,
    /// `r^3`
    Cubic,
    /// `-r^5`
    Quintic,
    /// `-sqrt(r^2 + 1)`
    Multiquadric,
    /// `1 / sqrt(r^2 + 1)`
    InverseMultiquadric,
    /// `1 / (r^2 + 1)`
    InverseQuadratic,
    /// `exp(-r^2)`
    Gaussian,
}

impl Kernel {
    /// Parse from a string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "linear" => Some(Self::Linear),
            "thin_plate_spline" | "tps" => Some(Self::ThinPlateSpline),
            "cubic" => Some(Self::Cubic),
            "quintic" => Some(Self::Quintic),
            "multiquadric" => Some(Self::Multiquadric),
            "inverse_multiquadric" => Some(Self::InverseMultiquadric),
            "inverse_quadratic" => Some(Self::InverseQuadratic),
            "gaussian" => Some(Self::Gaussian),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::ThinPlateSpline => "thin_plate_spline",
            Self::Cubic => "cubic",
            Self::Quintic => "quintic",
            Self::Multiquadric => "multiquadric",
            Self::InverseMultiquadric => "inverse_multiquadric",
            Self::InverseQuadratic => "inverse_quadratic",
            Self::Gaussian => "gaussian",
        }
    }

    /// Evaluate the kernel at scaled radius `r`.
    #[inline]
    pub fn eval(self, r: f64) -> f64 {
        match self {
            Self::Linear => -r,
            Self::ThinPlateSpline => {
                if r == 0.0 {
                    0.0
                } else {
                    r * r * r.ln()
                }
            }
            Self::Cubic => r * r * r,
            Self::Quintic => -r.powi(5),
            Self::Multiquadric => -(r * r + 1.0).sqrt(),
            Self::InverseMultiquadric => 1.0 / (r * r + 1.0).sqrt(),
            Self::InverseQuadratic => 1.0 / (r * r + 1.0),
            Self::Gaussian => (-r * r).exp(),
        }
    }

    /// True if the kernel has no intrinsic length scale.
    ///
    /// For these kernels epsilon only rescales the fit and defaults to 1.
    pub fn is_scale_free(self) -> bool {
        matches!(
            self,
            Self::Linear | Self::ThinPlateSpline | Self::Cubic | Self::Quintic
        )
    }

    /// Smallest polynomial degree for which the system is well-posed.
    ///
    /// `-1` means no polynomial tail is required.
    pub fn min_degree(self) -> i32 {
        match self {
            Self::Linear => 0,
            Self::ThinPlateSpline | Self::Cubic => 1,
            Self::Quintic => 2,
            Self::Multiquadric
            | Self::InverseMultiquadric
            | Self::InverseQuadratic
            | Self::Gaussian => -1,
        }
    }

    /// Polynomial degree used when none is configured.
    pub fn default_degree(self) -> i32 {
        self.min_degree().max(1)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
