//! Polynomial tail for RBF interpolation in two dimensions.

/// Exponent pairs `(px, py)` of every monomial with total degree `<= degree`.
///
/// A negative degree yields no monomials.
pub fn monomial_powers(degree: i32) -> Vec<(i32, i32)> {
    let mut powers = Vec::new();
    for total in 0..=degree {
        for py in 0..=total {
            powers.push((total - py, py));
        }
    }
    powers
}

/// Number of monomials with total degree `<= degree` in two dimensions.
pub fn monomial_count(degree: i32) -> usize {
    if degree < 0 {
        0
    } else {
        let d = degree as usize;
        (d + 1) * (d + 2) / 2
    }
}

/// Affine map sending a point cloud's bounding box onto `[-1, 1]^2`.
///
/// An axis with zero extent is only shifted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Bounding-box centre per axis.
    pub shift: [f64; 2],
    /// Bounding-box half-range per axis.
    pub scale: [f64; 2],
}

impl Normalization {
    /// Compute the normalization of a point cloud.
    pub fn from_points(points: &[[f64; 2]]) -> Self {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for p in points {
            for axis in 0..2 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }

        let mut shift = [0.0; 2];
        let mut scale = [1.0; 2];
        for axis in 0..2 {
            shift[axis] = (max[axis] + min[axis]) / 2.0;
            let half = (max[axis] - min[axis]) / 2.0;
            if half != 0.0 {
                scale[axis] = half;
            }
        }
        Self { shift, scale }
    }

    /// Apply the map to one point.
    #[inline]
    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        [
            (p[0] - self.shift[0]) / self.scale[0],
            (p[1] - self.shift[1]) / self.scale[1],
        ]
    }
}

/// Evaluate every monomial at a (normalized) point, writing into `out`.
#[inline]
pub fn eval_monomials(powers: &[(i32, i32)], p: [f64; 2], out: &mut [f64]) {
    for (slot, &(px, py)) in out.iter_mut().zip(powers) {
        *slot = p[0].powi(px) * p[1].powi(py);
    }
}
