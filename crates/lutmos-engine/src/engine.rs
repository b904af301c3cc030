//! The lookup-table engine.

use lutmos_core::{Quantity, SampleRow, SampleTable};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::store::BiasPlaneStore;

/// gm/Id lookup table over bias planes.
///
/// Tables are added with [`record`](Self::record) and fitted with
/// [`rebuild`](Self::rebuild). Queries take `&self` and never mutate the
/// engine, so a built engine can be shared between threads.
///
/// ```rust
/// use lutmos_core::{Quantity, SampleRow};
/// use lutmos_engine::LutEngine;
///
/// let mut lut = LutEngine::new();
/// let rows: Vec<SampleRow> = [180.0, 360.0, 720.0]
///     .iter()
///     .flat_map(|&l| [5.0, 10.0, 15.0].map(|g| SampleRow::new(g, l, g + l / 36.0)))
///     .collect();
/// lut.record(Quantity::Gmro, 0.4, rows).unwrap();
/// lut.rebuild().unwrap();
///
/// let gmro = lut.predict(Quantity::Gmro, 10.0, 0.4, 360.0).unwrap();
/// assert!((gmro - 20.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LutEngine {
    pub(crate) config: EngineConfig,
    pub(crate) store: BiasPlaneStore,
}

impl LutEngine {
    /// Create an empty engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            store: BiasPlaneStore::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying plane store.
    pub fn store(&self) -> &BiasPlaneStore {
        &self.store
    }

    /// Append sweep rows for `quantity` at `bias`.
    ///
    /// Recording is additive: rows for an existing plane are concatenated.
    /// Call [`rebuild`](Self::rebuild) afterwards. Returns the number of
    /// rows kept.
    pub fn record<I>(&mut self, quantity: Quantity, bias: f64, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = SampleRow>,
    {
        self.store.record(quantity, bias, rows)
    }

    /// Fit every plane and recompute the length universe.
    pub fn rebuild(&mut self) -> Result<()> {
        self.store
            .rebuild(&self.config.rbf, self.config.parallel_rebuild)
    }

    /// Sorted distinct channel lengths seen at the last rebuild.
    pub fn lengths(&self) -> Option<&[i64]> {
        self.store.lengths()
    }

    /// Ascending biases holding samples for `quantity`.
    pub fn biases(&self, quantity: Quantity) -> Vec<f64> {
        self.store.quantity(quantity).biases()
    }

    /// Raw samples recorded for `quantity` at exactly `bias`.
    pub fn table(&self, quantity: Quantity, bias: f64) -> Option<&SampleTable> {
        self.store
            .quantity(quantity)
            .plane(bias)
            .map(|plane| plane.table())
    }

    /// Number of non-empty planes for `quantity`.
    pub fn plane_count(&self, quantity: Quantity) -> usize {
        self.store.quantity(quantity).plane_count()
    }

    /// True once a rebuild has succeeded.
    pub fn is_built(&self) -> bool {
        self.store.is_built()
    }

    /// True if rows were recorded since the last successful rebuild.
    pub fn needs_rebuild(&self) -> bool {
        self.store.needs_rebuild()
    }

    pub(crate) fn warn_if_stale(&self) {
        if self.store.needs_rebuild() {
            log::warn!("lookup table has unfitted rows; call rebuild() before querying");
        }
    }
}
