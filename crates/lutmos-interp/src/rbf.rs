//! Radial basis function interpolation over scattered 2D points.
//!
//! The interpolant has the form
//!
//! ```text
//! f(x) = sum_i w_i * phi(eps * |x - x_i|) + sum_j a_j * m_j(x_hat)
//! ```
//!
//! where `phi` is the [`Kernel`], `m_j` are the monomials of the polynomial
//! tail evaluated at `x_hat` (the point mapped onto the data's unit box), and
//! the weights solve the augmented system
//!
//! ```text
//! | K + s*I   P | | w |   | d |
//! | P^T       0 | | a | = | 0 |
//! ```

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::config::RbfConfig;
use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::polynomial::{Normalization, eval_monomials, monomial_count, monomial_powers};

/// A continuous function of (gm/Id, length).
pub trait Evaluable2D: Send + Sync {
    /// Evaluate at one point.
    fn evaluate(&self, gm_id: f64, length_nm: f64) -> f64;
}

/// Fitted RBF interpolant.
#[derive(Debug, Clone)]
pub struct RbfInterpolator {
    kernel: Kernel,
    epsilon: f64,
    degree: i32,
    /// Data coordinates pre-multiplied by epsilon.
    centers: Vec<[f64; 2]>,
    normalization: Normalization,
    powers: Vec<(i32, i32)>,
    kernel_weights: DVector<f64>,
    poly_weights: DVector<f64>,
}

impl RbfInterpolator {
    /// Fit an interpolant through `values` at `points`.
    ///
    /// Points are `[gm_id, length_nm]` pairs. With zero smoothing the result
    /// reproduces every training value at its training coordinate.
    pub fn fit(points: &[[f64; 2]], values: &[f64], config: &RbfConfig) -> Result<Self> {
        if points.len() != values.len() {
            return Err(Error::DimensionMismatch {
                expected: points.len(),
                actual: values.len(),
            });
        }
        let finite = points.iter().all(|p| p[0].is_finite() && p[1].is_finite())
            && values.iter().all(|v| v.is_finite())
            && config.smoothing.is_finite();
        if !finite {
            return Err(Error::NonFiniteInput);
        }

        let kernel = config.kernel;
        let epsilon = config.resolved_epsilon()?;
        let degree = config.resolved_degree();
        if degree < kernel.min_degree() {
            log::warn!(
                "polynomial degree {} is below the minimum {} for the {} kernel; \
                 the system may not be uniquely solvable",
                degree,
                kernel.min_degree(),
                kernel
            );
        }

        let n = points.len();
        let powers = monomial_powers(degree);
        let m = monomial_count(degree);
        let required = m.max(1);
        if n < required {
            return Err(Error::TooFewPoints {
                required,
                actual: n,
            });
        }
        if n > 1 && points.iter().all(|p| *p == points[0]) {
            return Err(Error::DegeneratePoints);
        }

        let normalization = Normalization::from_points(points);
        let centers: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p[0] * epsilon, p[1] * epsilon])
            .collect();

        let mut poly = DMatrix::<f64>::zeros(n, m);
        let mut row = vec![0.0; m];
        for (i, p) in points.iter().enumerate() {
            eval_monomials(&powers, normalization.apply(*p), &mut row);
            for (j, v) in row.iter().enumerate() {
                poly[(i, j)] = *v;
            }
        }
        if m > 0 && !has_full_column_rank(&poly) {
            return Err(Error::RankDeficientPolynomial { degree });
        }

        let size = n + m;
        let mut lhs = DMatrix::<f64>::zeros(size, size);
        for r in 0..n {
            for c in 0..n {
                lhs[(r, c)] = kernel.eval(distance(centers[r], centers[c]));
            }
            lhs[(r, r)] += config.smoothing;
        }
        for i in 0..n {
            for j in 0..m {
                lhs[(i, n + j)] = poly[(i, j)];
                lhs[(n + j, i)] = poly[(i, j)];
            }
        }

        let mut rhs = DVector::<f64>::zeros(size);
        for (i, v) in values.iter().enumerate() {
            rhs[i] = *v;
        }

        log::debug!(
            "fitting {} RBF over {} points (epsilon = {}, degree = {})",
            kernel,
            n,
            epsilon,
            degree
        );

        let coeffs = lhs.lu().solve(&rhs).ok_or(Error::SingularMatrix)?;
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(Error::SingularMatrix);
        }

        Ok(Self {
            kernel,
            epsilon,
            degree,
            centers,
            normalization,
            powers,
            kernel_weights: DVector::from_iterator(n, coeffs.iter().take(n).copied()),
            poly_weights: DVector::from_iterator(m, coeffs.iter().skip(n).copied()),
        })
    }

    /// Evaluate at one point.
    pub fn eval(&self, gm_id: f64, length_nm: f64) -> f64 {
        let x = [gm_id * self.epsilon, length_nm * self.epsilon];
        let mut acc = 0.0;
        for (center, w) in self.centers.iter().zip(self.kernel_weights.iter()) {
            acc += w * self.kernel.eval(distance(x, *center));
        }

        let xhat = self.normalization.apply([gm_id, length_nm]);
        for (&(px, py), a) in self.powers.iter().zip(self.poly_weights.iter()) {
            acc += a * xhat[0].powi(px) * xhat[1].powi(py);
        }
        acc
    }

    /// Evaluate at many points in parallel.
    pub fn evaluate_batch(&self, points: &[[f64; 2]]) -> Vec<f64> {
        points.par_iter().map(|p| self.eval(p[0], p[1])).collect()
    }

    /// Kernel used by this interpolant.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Shape parameter used by this interpolant.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Polynomial tail degree (-1 for none).
    pub fn degree(&self) -> i32 {
        self.degree
    }

    /// Number of RBF centres.
    pub fn num_centers(&self) -> usize {
        self.centers.len()
    }
}

impl Evaluable2D for RbfInterpolator {
    fn evaluate(&self, gm_id: f64, length_nm: f64) -> f64 {
        self.eval(gm_id, length_nm)
    }
}

#[inline]
fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

fn has_full_column_rank(p: &DMatrix<f64>) -> bool {
    let sv = p.singular_values();
    let smax = sv.iter().cloned().fold(0.0, f64::max);
    let tol = smax * p.nrows().max(p.ncols()) as f64 * f64::EPSILON;
    sv.iter().filter(|&&s| s > tol).count() == p.ncols()
}
