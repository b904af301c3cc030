//! Bias-plane storage.
//!
//! Every quantity owns a [`PlaneStore`]: an ordered map from bias to the raw
//! samples recorded at that bias and the interpolant fitted from them at the
//! last rebuild. [`BiasPlaneStore`] groups the three quantity stores and the
//! length universe derived from all of them.

use std::collections::{BTreeMap, BTreeSet};

use lutmos_core::{Quantity, SampleRow, SampleTable};
use lutmos_interp::{RbfConfig, RbfInterpolator};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::error::{Error, Result};

type BiasKey = OrderedFloat<f64>;

/// Samples and fitted interpolant for one (quantity, bias) pair.
#[derive(Debug, Clone)]
pub struct BiasPlane {
    bias: f64,
    table: SampleTable,
    interpolant: Option<RbfInterpolator>,
}

impl BiasPlane {
    fn new(bias: f64) -> Self {
        Self {
            bias,
            table: SampleTable::new(),
            interpolant: None,
        }
    }

    /// Bias of this plane.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Raw samples accumulated for this plane.
    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    /// Interpolant fitted at the last rebuild, if any.
    pub fn interpolant(&self) -> Option<&RbfInterpolator> {
        self.interpolant.as_ref()
    }
}

/// All bias planes of one quantity, ordered by bias.
#[derive(Debug, Clone)]
pub struct PlaneStore {
    quantity: Quantity,
    planes: BTreeMap<BiasKey, BiasPlane>,
}

impl PlaneStore {
    fn new(quantity: Quantity) -> Self {
        Self {
            quantity,
            planes: BTreeMap::new(),
        }
    }

    /// Quantity held by this store.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Plane at exactly `bias`.
    pub fn plane(&self, bias: f64) -> Option<&BiasPlane> {
        self.planes.get(&bias_key(bias))
    }

    /// Iterate over planes in ascending bias order.
    pub fn planes(&self) -> impl Iterator<Item = &BiasPlane> {
        self.planes.values()
    }

    /// Ascending biases of planes holding at least one sample.
    pub fn biases(&self) -> Vec<f64> {
        self.planes()
            .filter(|p| !p.table.is_empty())
            .map(|p| p.bias)
            .collect()
    }

    /// Ascending biases of planes with a fitted interpolant.
    pub fn fitted_biases(&self) -> Vec<f64> {
        self.planes()
            .filter(|p| p.interpolant.is_some())
            .map(|p| p.bias)
            .collect()
    }

    /// True if any sample has been recorded for this quantity.
    pub fn has_data(&self) -> bool {
        self.planes.values().any(|p| !p.table.is_empty())
    }

    /// Number of planes holding samples.
    pub fn plane_count(&self) -> usize {
        self.planes.values().filter(|p| !p.table.is_empty()).count()
    }
}

/// Per-quantity plane stores plus the shared length universe.
#[derive(Debug, Clone)]
pub struct BiasPlaneStore {
    stores: [PlaneStore; 3],
    lengths: Option<Vec<i64>>,
    built: bool,
    stale: bool,
}

impl Default for BiasPlaneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BiasPlaneStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            stores: Quantity::ALL.map(PlaneStore::new),
            lengths: None,
            built: false,
            stale: false,
        }
    }

    /// Store for one quantity.
    pub fn quantity(&self, quantity: Quantity) -> &PlaneStore {
        &self.stores[quantity.index()]
    }

    /// Append rows to the `(quantity, bias)` plane, creating it if absent.
    ///
    /// Rows with a missing field are dropped. Returns the number of rows
    /// kept.
    pub fn record<I>(&mut self, quantity: Quantity, bias: f64, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = SampleRow>,
    {
        if !bias.is_finite() {
            return Err(Error::InvalidBias(bias));
        }
        let bias = if bias == 0.0 { 0.0 } else { bias };

        let plane = self.stores[quantity.index()]
            .planes
            .entry(bias_key(bias))
            .or_insert_with(|| BiasPlane::new(bias));

        let before = plane.table.len();
        let mut dropped = 0usize;
        plane.table.extend(rows.into_iter().filter(|row| {
            let complete = row.is_complete();
            if !complete {
                dropped += 1;
            }
            complete
        }));
        let kept = plane.table.len() - before;

        if dropped > 0 {
            log::debug!(
                "dropped {} incomplete {} rows at bias {}",
                dropped,
                quantity,
                bias
            );
        }
        if kept > 0 {
            self.stale = true;
        }
        Ok(kept)
    }

    /// Refit every non-empty plane and recompute the length universe.
    ///
    /// The new interpolants replace the old ones as a unit: if any plane
    /// fails to fit, the store is left as it was and the error is returned.
    pub fn rebuild(&mut self, config: &RbfConfig, parallel: bool) -> Result<()> {
        let jobs: Vec<(Quantity, BiasKey, &SampleTable)> = self
            .stores
            .iter()
            .flat_map(|store| {
                store
                    .planes
                    .iter()
                    .filter(|(_, plane)| !plane.table.is_empty())
                    .map(move |(key, plane)| (store.quantity, *key, &plane.table))
            })
            .collect();

        let fit = |&(quantity, key, table): &(Quantity, BiasKey, &SampleTable)| {
            let (points, values) = table.fit_points();
            if table.len() > 1 && points.len() == 1 {
                return Err(Error::PlaneFit {
                    quantity,
                    bias: key.0,
                    source: lutmos_interp::Error::DegeneratePoints,
                });
            }
            if points.len() < table.len() {
                log::debug!(
                    "{} plane at bias {}: merged {} rows into {} distinct points",
                    quantity,
                    key.0,
                    table.len(),
                    points.len()
                );
            }
            RbfInterpolator::fit(&points, &values, config)
                .map(|rbf| (quantity, key, rbf))
                .map_err(|source| Error::PlaneFit {
                    quantity,
                    bias: key.0,
                    source,
                })
        };

        let fitted: Vec<(Quantity, BiasKey, RbfInterpolator)> = if parallel {
            jobs.par_iter().map(fit).collect::<Result<_>>()?
        } else {
            jobs.iter().map(fit).collect::<Result<_>>()?
        };

        let lengths = self.length_universe();

        for store in &mut self.stores {
            for plane in store.planes.values_mut() {
                plane.interpolant = None;
            }
        }
        let count = fitted.len();
        for (quantity, key, rbf) in fitted {
            if let Some(plane) = self.stores[quantity.index()].planes.get_mut(&key) {
                plane.interpolant = Some(rbf);
            }
        }

        log::info!(
            "built {} bias planes ({} id_w, {} gmro, {} ft) over {} lengths",
            count,
            self.quantity(Quantity::IdW).fitted_biases().len(),
            self.quantity(Quantity::Gmro).fitted_biases().len(),
            self.quantity(Quantity::Ft).fitted_biases().len(),
            lengths.as_ref().map_or(0, Vec::len)
        );

        self.lengths = lengths;
        self.built = true;
        self.stale = false;
        Ok(())
    }

    /// Sorted distinct integer lengths seen at the last rebuild.
    pub fn lengths(&self) -> Option<&[i64]> {
        self.lengths.as_deref()
    }

    /// True once `rebuild` has succeeded at least once.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// True if rows were recorded since the last successful rebuild.
    pub fn needs_rebuild(&self) -> bool {
        self.stale
    }

    fn length_universe(&self) -> Option<Vec<i64>> {
        let mut lengths = BTreeSet::new();
        let mut fractional = 0usize;
        for store in &self.stores {
            for plane in store.planes.values() {
                for row in plane.table.iter() {
                    let truncated = row.length_nm.trunc();
                    if truncated != row.length_nm {
                        fractional += 1;
                    }
                    lengths.insert(truncated as i64);
                }
            }
        }

        if fractional > 0 {
            log::warn!(
                "{} rows have non-integer lengths; they are truncated in the length \
                 universe and ignored by length estimation",
                fractional
            );
        }

        if lengths.is_empty() {
            None
        } else {
            Some(lengths.into_iter().collect())
        }
    }
}

fn bias_key(bias: f64) -> BiasKey {
    OrderedFloat(bias)
}
