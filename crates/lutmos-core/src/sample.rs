//! Sweep samples for one quantity at one bias.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One simulated sample: a device figure at a given gm/Id and channel length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Transconductance efficiency gm/Id (1/V).
    pub gm_id: f64,
    /// Channel length (nm).
    pub length_nm: f64,
    /// Tabulated value of the quantity.
    pub value: f64,
}

impl SampleRow {
    /// Create a new sample row.
    pub fn new(gm_id: f64, length_nm: f64, value: f64) -> Self {
        Self {
            gm_id,
            length_nm,
            value,
        }
    }

    /// True if no field is missing (NaN).
    pub fn is_complete(&self) -> bool {
        !(self.gm_id.is_nan() || self.length_nm.is_nan() || self.value.is_nan())
    }
}

impl From<(f64, f64, f64)> for SampleRow {
    fn from((gm_id, length_nm, value): (f64, f64, f64)) -> Self {
        Self::new(gm_id, length_nm, value)
    }
}

/// Ordered collection of samples for one (quantity, bias) plane.
///
/// Rows are kept in insertion order and are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    rows: Vec<SampleRow>,
}

impl SampleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows.
    pub fn from_rows(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }

    /// Append one row.
    pub fn push(&mut self, row: SampleRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, SampleRow> {
        self.rows.iter()
    }

    /// Fit points for a scattered interpolant over (gm_id, length_nm).
    ///
    /// Rows sharing the exact same coordinates collapse into a single point
    /// carrying the mean of their values. Points keep the order in which
    /// their coordinates first appear.
    pub fn fit_points(&self) -> (Vec<[f64; 2]>, Vec<f64>) {
        let mut index: HashMap<(u64, u64), usize> = HashMap::with_capacity(self.rows.len());
        let mut points: Vec<[f64; 2]> = Vec::with_capacity(self.rows.len());
        let mut sums: Vec<f64> = Vec::with_capacity(self.rows.len());
        let mut counts: Vec<usize> = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            let key = (coordinate_bits(row.gm_id), coordinate_bits(row.length_nm));
            match index.get(&key) {
                Some(&i) => {
                    sums[i] += row.value;
                    counts[i] += 1;
                }
                None => {
                    index.insert(key, points.len());
                    points.push([row.gm_id, row.length_nm]);
                    sums.push(row.value);
                    counts.push(1);
                }
            }
        }

        let values = sums
            .iter()
            .zip(&counts)
            .map(|(sum, &count)| sum / count as f64)
            .collect();
        (points, values)
    }

    /// The (gm_id, value) curve at one exact channel length, sorted by gm_id.
    ///
    /// Rows with equal gm_id keep their insertion order.
    pub fn curve_at_length(&self, length_nm: f64) -> (Vec<f64>, Vec<f64>) {
        let mut slice: Vec<&SampleRow> = self
            .rows
            .iter()
            .filter(|r| r.length_nm == length_nm)
            .collect();
        slice.sort_by(|a, b| a.gm_id.total_cmp(&b.gm_id));
        slice.into_iter().map(|r| (r.gm_id, r.value)).unzip()
    }
}

impl Extend<SampleRow> for SampleTable {
    fn extend<I: IntoIterator<Item = SampleRow>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl FromIterator<SampleRow> for SampleTable {
    fn from_iter<I: IntoIterator<Item = SampleRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SampleTable {
    type Item = &'a SampleRow;
    type IntoIter = std::slice::Iter<'a, SampleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// -0.0 and 0.0 are the same coordinate.
fn coordinate_bits(x: f64) -> u64 {
    if x == 0.0 { 0.0f64.to_bits() } else { x.to_bits() }
}
