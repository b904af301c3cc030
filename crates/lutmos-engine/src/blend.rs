//! Cross-plane blending along the bias axis.
//!
//! Bias is sampled sparsely (a few planes) while gm/Id and length are dense
//! inside each plane, so an off-plane query evaluates the two neighbouring
//! planes and interpolates linearly between them.

use lutmos_interp::Evaluable2D;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::PlaneStore;

/// How a query bias was mapped onto the available planes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaneSelection {
    /// The bias matches a plane.
    Exact { bias: f64 },
    /// The bias lies below every plane; the lowest plane is used.
    ClampedBelow { bias: f64 },
    /// The bias lies above every plane; the highest plane is used.
    ClampedAbove { bias: f64 },
    /// Linear blend `y1 + t * (y2 - y1)` of two adjacent planes.
    Blend { lower: f64, upper: f64, t: f64 },
    /// No adjacent pair contains the bias, which happens for a NaN bias;
    /// the last plane is used.
    Fallback { bias: f64 },
}

impl PlaneSelection {
    /// True for the degenerate fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, PlaneSelection::Fallback { .. })
    }
}

/// Map `bias` onto `available`, which should be sorted ascending.
///
/// Returns `None` when no plane is available. A plane within `tolerance` of
/// `bias` is an exact match (the nearest one wins); with zero tolerance only
/// an equal bias matches.
pub fn select_planes(available: &[f64], bias: f64, tolerance: f64) -> Option<PlaneSelection> {
    let (&first, &last) = (available.first()?, available.last()?);

    let exact = available
        .iter()
        .copied()
        .filter(|v| (v - bias).abs() <= tolerance)
        .min_by(|a, b| (a - bias).abs().total_cmp(&(b - bias).abs()));
    if let Some(v) = exact {
        return Some(PlaneSelection::Exact { bias: v });
    }

    if bias < first {
        return Some(PlaneSelection::ClampedBelow { bias: first });
    }
    if bias > last {
        return Some(PlaneSelection::ClampedAbove { bias: last });
    }

    let pair = available
        .windows(2)
        .find(|w| w[0] <= bias && bias <= w[1]);
    match pair {
        Some(w) => {
            let (lower, upper) = (w[0], w[1]);
            Some(PlaneSelection::Blend {
                lower,
                upper,
                t: (bias - lower) / (upper - lower),
            })
        }
        None => {
            log::warn!(
                "bias {} is not bracketed by planes {:?}; falling back to plane {}",
                bias,
                available,
                last
            );
            Some(PlaneSelection::Fallback { bias: last })
        }
    }
}

/// Linear interpolation between two plane values.
#[inline]
pub fn blend(y1: f64, y2: f64, t: f64) -> f64 {
    y1 + t * (y2 - y1)
}

/// Evaluator for one quantity at a fixed bias.
pub struct CrossPlaneEvaluator<'a> {
    selection: PlaneSelection,
    primary: &'a dyn Evaluable2D,
    secondary: Option<(&'a dyn Evaluable2D, f64)>,
}

impl<'a> CrossPlaneEvaluator<'a> {
    /// Plane selection behind this evaluator.
    pub fn selection(&self) -> PlaneSelection {
        self.selection
    }
}

impl Evaluable2D for CrossPlaneEvaluator<'_> {
    fn evaluate(&self, gm_id: f64, length_nm: f64) -> f64 {
        let y1 = self.primary.evaluate(gm_id, length_nm);
        match self.secondary {
            None => y1,
            Some((upper, t)) => blend(y1, upper.evaluate(gm_id, length_nm), t),
        }
    }
}

impl PlaneStore {
    /// Resolve `bias` to an evaluator over this quantity's fitted planes.
    pub fn resolve(&self, bias: f64, tolerance: f64) -> Result<CrossPlaneEvaluator<'_>> {
        let available = self.fitted_biases();
        let selection = select_planes(&available, bias, tolerance).ok_or_else(|| {
            Error::NotBuilt(format!("no fitted planes for quantity '{}'", self.quantity()))
        })?;
        log::debug!("{} at bias {}: {:?}", self.quantity(), bias, selection);

        let (primary, secondary) = match selection {
            PlaneSelection::Exact { bias }
            | PlaneSelection::ClampedBelow { bias }
            | PlaneSelection::ClampedAbove { bias }
            | PlaneSelection::Fallback { bias } => (self.fitted(bias)?, None),
            PlaneSelection::Blend { lower, upper, t } => {
                (self.fitted(lower)?, Some((self.fitted(upper)?, t)))
            }
        };

        Ok(CrossPlaneEvaluator {
            selection,
            primary,
            secondary,
        })
    }

    fn fitted(&self, bias: f64) -> Result<&dyn Evaluable2D> {
        self.plane(bias)
            .and_then(|p| p.interpolant())
            .map(|rbf| rbf as &dyn Evaluable2D)
            .ok_or_else(|| Error::NotBuilt(format!("no fitted plane at bias {}", bias)))
    }
}
