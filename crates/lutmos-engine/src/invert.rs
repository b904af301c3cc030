//! Length estimation from a measured gmro.
//!
//! The inverse query works on raw gmro samples rather than the fitted planes:
//! it snaps the query bias to the nearest recorded plane, rebuilds a gmro
//! value per tabulated length by linear interpolation along gm/Id, and then
//! searches the resulting gmro-versus-length curve for the pair of adjacent
//! lengths whose values bracket the measurement.

use lutmos_core::{Quantity, SampleTable};
use lutmos_interp::interp_linear;
use serde::Serialize;

use crate::engine::LutEngine;
use crate::error::{Error, Result};

/// Which length estimate a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimateMode {
    /// Integer length from the tabulated set.
    #[default]
    Discrete,
    /// Interpolated length together with the discrete one.
    Continuous,
}

/// Result of [`LutEngine::estimate_length`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LengthAnswer {
    Discrete(i64),
    Continuous { continuous_nm: f64, discrete_nm: i64 },
}

/// How the estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateMethod {
    /// The measurement lies between the gmro values at `lower` and `upper`.
    Bracketed { lower: i64, upper: i64 },
    /// No adjacent pair brackets the measurement; the length with the
    /// closest reconstructed gmro was taken.
    Nearest,
}

/// Estimate drawn from a reconstructed gmro curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveEstimate {
    pub continuous_nm: f64,
    pub discrete_nm: i64,
    pub method: EstimateMethod,
    /// Number of adjacent pairs that bracket the measurement.
    pub bracket_count: usize,
}

/// Full result of a length estimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthEstimate {
    /// Bias of the plane the query was snapped to.
    pub plane_bias: f64,
    pub continuous_nm: f64,
    pub discrete_nm: i64,
    pub method: EstimateMethod,
    pub bracket_count: usize,
    /// Reconstructed `(length, gmro)` pairs in ascending length order.
    pub curve: Vec<(i64, f64)>,
}

impl LengthEstimate {
    /// Project onto the requested answer shape.
    pub fn answer(&self, mode: EstimateMode) -> LengthAnswer {
        match mode {
            EstimateMode::Discrete => LengthAnswer::Discrete(self.discrete_nm),
            EstimateMode::Continuous => LengthAnswer::Continuous {
                continuous_nm: self.continuous_nm,
                discrete_nm: self.discrete_nm,
            },
        }
    }
}

/// Nearest bias in `biases` (ascending) to `bias`. Ties go to the lower one.
pub fn snap_plane(biases: &[f64], bias: f64) -> Option<f64> {
    let (&first, rest) = biases.split_first()?;
    let mut best = first;
    let mut best_distance = (first - bias).abs();
    for &candidate in rest {
        let distance = (candidate - bias).abs();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    Some(best)
}

/// gmro at `gm_id` for each length in `lengths` that has samples in `table`.
pub fn reconstruct_curve(table: &SampleTable, lengths: &[i64], gm_id: f64) -> Result<Vec<(i64, f64)>> {
    let mut curve = Vec::with_capacity(lengths.len());
    for &length in lengths {
        let (xp, fp) = table.curve_at_length(length as f64);
        if xp.is_empty() {
            continue;
        }
        curve.push((length, interp_linear(gm_id, &xp, &fp)?));
    }
    Ok(curve)
}

/// Locate `measured` on an ascending-length gmro curve.
///
/// Returns `None` for an empty curve.
pub fn estimate_from_curve(
    curve: &[(i64, f64)],
    measured: f64,
    flat_tolerance: f64,
) -> Option<CurveEstimate> {
    if curve.is_empty() {
        return None;
    }

    let mut brackets = curve.windows(2).filter(|w| {
        let (g1, g2) = (w[0].1, w[1].1);
        (g1 <= measured && measured <= g2) || (g2 <= measured && measured <= g1)
    });

    if let Some(first) = brackets.next() {
        let bracket_count = 1 + brackets.count();
        let ((l1, g1), (l2, g2)) = (first[0], first[1]);
        let continuous_nm = if (g2 - g1).abs() < flat_tolerance {
            (l1 + l2) as f64 / 2.0
        } else {
            let t = (measured - g1) / (g2 - g1);
            l1 as f64 + t * (l2 - l1) as f64
        };
        return Some(CurveEstimate {
            continuous_nm,
            discrete_nm: l1.max(l2),
            method: EstimateMethod::Bracketed {
                lower: l1,
                upper: l2,
            },
            bracket_count,
        });
    }

    let (mut nearest, mut best_distance) = (curve[0].0, (curve[0].1 - measured).abs());
    for &(length, gmro) in &curve[1..] {
        let distance = (gmro - measured).abs();
        if distance < best_distance {
            nearest = length;
            best_distance = distance;
        }
    }
    Some(CurveEstimate {
        continuous_nm: nearest as f64,
        discrete_nm: nearest,
        method: EstimateMethod::Nearest,
        bracket_count: 0,
    })
}

impl LutEngine {
    /// Estimate the channel length that yields `gmro` at `gm_id` and `bias`.
    pub fn estimate_length(
        &self,
        gm_id: f64,
        gmro: f64,
        bias: f64,
        mode: EstimateMode,
    ) -> Result<LengthAnswer> {
        self.estimate_length_detailed(gm_id, gmro, bias)
            .map(|estimate| estimate.answer(mode))
    }

    /// Like [`estimate_length`](Self::estimate_length) but returns the snapped
    /// plane, the reconstructed curve and how the answer was found.
    pub fn estimate_length_detailed(&self, gm_id: f64, gmro: f64, bias: f64) -> Result<LengthEstimate> {
        let store = self.store.quantity(Quantity::Gmro);
        if !store.has_data() {
            return Err(Error::NoGmroData);
        }
        let lengths = self
            .lengths()
            .ok_or_else(|| Error::NotBuilt("length universe not computed".to_string()))?;
        self.warn_if_stale();

        let plane_bias = snap_plane(&store.biases(), bias).ok_or(Error::NoGmroData)?;
        let plane = store.plane(plane_bias).ok_or(Error::NoGmroData)?;

        let curve = reconstruct_curve(plane.table(), lengths, gm_id)?;
        let estimate = estimate_from_curve(&curve, gmro, self.config.flat_tolerance)
            .ok_or(Error::NoSamplesAtPlane { bias: plane_bias })?;

        match estimate.method {
            EstimateMethod::Nearest => log::warn!(
                "gmro {} is not bracketed at gm/Id {} on plane {}; using nearest length {}",
                gmro,
                gm_id,
                plane_bias,
                estimate.discrete_nm
            ),
            EstimateMethod::Bracketed { lower, upper } if estimate.bracket_count > 1 => {
                log::warn!(
                    "gmro {} is bracketed {} times on plane {}; using the first ({}, {})",
                    gmro,
                    estimate.bracket_count,
                    plane_bias,
                    lower,
                    upper
                )
            }
            EstimateMethod::Bracketed { .. } => {}
        }
        log::debug!(
            "estimated length {} nm ({}) from {} curve points",
            estimate.continuous_nm,
            estimate.discrete_nm,
            curve.len()
        );

        Ok(LengthEstimate {
            plane_bias,
            continuous_nm: estimate.continuous_nm,
            discrete_nm: estimate.discrete_nm,
            method: estimate.method,
            bracket_count: estimate.bracket_count,
            curve,
        })
    }
}
