//! Device quantities stored in a lookup table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A device figure of merit tabulated against gm/Id and channel length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quantity {
    /// Drain current per unit width.
    #[serde(rename = "id_w")]
    IdW,
    /// Intrinsic gain gm·ro.
    #[serde(rename = "gmro")]
    Gmro,
    /// Transit frequency.
    #[serde(rename = "ft")]
    Ft,
}

impl Quantity {
    /// All quantities, in canonical order.
    pub const ALL: [Quantity; 3] = [Quantity::IdW, Quantity::Gmro, Quantity::Ft];

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::IdW => "id_w",
            Quantity::Gmro => "gmro",
            Quantity::Ft => "ft",
        }
    }

    /// Position of this quantity in [`Quantity::ALL`].
    pub fn index(self) -> usize {
        match self {
            Quantity::IdW => 0,
            Quantity::Gmro => 1,
            Quantity::Ft => 2,
        }
    }

    /// Look up a quantity by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.name() == name)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::InvalidQuantity {
            name: s.to_string(),
        })
    }
}
