//! Piecewise-linear interpolation in one dimension.

use crate::error::{Error, Result};

/// Interpolate `(xp, fp)` at `x`.
///
/// `xp` must be sorted ascending. Queries outside `[xp[0], xp[n-1]]` are
/// clamped to the edge sample; there is no extrapolation. At a repeated
/// abscissa the last sample wins. A NaN query yields NaN.
pub fn interp_linear(x: f64, xp: &[f64], fp: &[f64]) -> Result<f64> {
    if xp.len() != fp.len() {
        return Err(Error::DimensionMismatch {
            expected: xp.len(),
            actual: fp.len(),
        });
    }
    let n = xp.len();
    if n == 0 {
        return Err(Error::TooFewPoints {
            required: 1,
            actual: 0,
        });
    }

    if x.is_nan() {
        return Ok(f64::NAN);
    }
    if x < xp[0] {
        return Ok(fp[0]);
    }
    if x >= xp[n - 1] {
        return Ok(fp[n - 1]);
    }

    // Last index with xp[lo] <= x, so repeated abscissae resolve to their
    // final sample; 0 <= lo <= n-2 here.
    let lo = xp.partition_point(|&v| v <= x) - 1;
    if xp[lo] == x {
        return Ok(fp[lo]);
    }

    let hi = lo + 1;
    let alpha = (x - xp[lo]) / (xp[hi] - xp[lo]);
    Ok(fp[lo] * (1.0 - alpha) + fp[hi] * alpha)
}

/// Interpolate `(xp, fp)` at several points.
pub fn interp_linear_many(x: &[f64], xp: &[f64], fp: &[f64]) -> Result<Vec<f64>> {
    x.iter().map(|&xi| interp_linear(xi, xp, fp)).collect()
}
