//! Forward prediction: device figures at a (gm/Id, bias, length) point.

use lutmos_core::Quantity;
use lutmos_interp::Evaluable2D;
use serde::{Deserialize, Serialize};

use crate::blend::PlaneSelection;
use crate::engine::LutEngine;
use crate::error::{Error, Result};

/// A predicted value together with the plane selection that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Quantity predicted.
    pub quantity: Quantity,
    /// Predicted value.
    pub value: f64,
    /// How the query bias was mapped onto the fitted planes.
    pub selection: PlaneSelection,
}

/// All three device figures at one operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceFigures {
    /// Drain current per unit width.
    pub id_w: f64,
    /// Intrinsic gain.
    pub gmro: f64,
    /// Transit frequency.
    pub ft: f64,
}

impl DeviceFigures {
    /// Value of one quantity.
    pub fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::IdW => self.id_w,
            Quantity::Gmro => self.gmro,
            Quantity::Ft => self.ft,
        }
    }

    /// `(quantity, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Quantity, f64)> + '_ {
        Quantity::ALL.into_iter().map(move |q| (q, self.get(q)))
    }
}

impl LutEngine {
    /// Predict one quantity at `(gm_id, bias, length_nm)`.
    pub fn predict(
        &self,
        quantity: Quantity,
        gm_id: f64,
        bias: f64,
        length_nm: f64,
    ) -> Result<f64> {
        self.predict_detailed(quantity, gm_id, bias, length_nm)
            .map(|p| p.value)
    }

    /// Predict a quantity given by its canonical name (`id_w`, `gmro`, `ft`).
    pub fn predict_by_name(
        &self,
        name: &str,
        gm_id: f64,
        bias: f64,
        length_nm: f64,
    ) -> Result<f64> {
        let quantity: Quantity = name.parse()?;
        self.predict(quantity, gm_id, bias, length_nm)
    }

    /// Predict one quantity and report how the bias was resolved.
    pub fn predict_detailed(
        &self,
        quantity: Quantity,
        gm_id: f64,
        bias: f64,
        length_nm: f64,
    ) -> Result<Prediction> {
        let store = self.store.quantity(quantity);
        if !store.has_data() {
            return Err(Error::QuantityNotLoaded(quantity));
        }
        self.warn_if_stale();

        let evaluator = store.resolve(bias, self.config.bias_tolerance)?;
        Ok(Prediction {
            quantity,
            value: evaluator.evaluate(gm_id, length_nm),
            selection: evaluator.selection(),
        })
    }

    /// Predict Id/W, gmro and ft together.
    ///
    /// Fails as a whole if any quantity cannot be predicted.
    pub fn predict_all(&self, gm_id: f64, bias: f64, length_nm: f64) -> Result<DeviceFigures> {
        Ok(DeviceFigures {
            id_w: self.predict(Quantity::IdW, gm_id, bias, length_nm)?,
            gmro: self.predict(Quantity::Gmro, gm_id, bias, length_nm)?,
            ft: self.predict(Quantity::Ft, gm_id, bias, length_nm)?,
        })
    }
}
