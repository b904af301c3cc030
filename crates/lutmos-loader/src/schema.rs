//! Column layout of a sweep CSV.

use csv::StringRecord;
use lutmos_core::Quantity;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default header of the channel length column.
pub const LENGTH_COLUMN: &str = "length_nm";
/// Default header of the gm/Id column.
pub const GM_ID_COLUMN: &str = "ngm_id";

/// Names of the three columns read from a sweep CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub length: String,
    pub gm_id: String,
    pub value: String,
}

impl ColumnSchema {
    pub fn new(
        length: impl Into<String>,
        gm_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            length: length.into(),
            gm_id: gm_id.into(),
            value: value.into(),
        }
    }

    /// Standard simulator export layout: `length_nm`, `ngm_id` and one of
    /// `nidw`, `ngmro`, `nft`.
    pub fn for_quantity(quantity: Quantity) -> Self {
        let value = match quantity {
            Quantity::IdW => "nidw",
            Quantity::Gmro => "ngmro",
            Quantity::Ft => "nft",
        };
        Self::new(LENGTH_COLUMN, GM_ID_COLUMN, value)
    }

    /// Guess the value column from the headers.
    ///
    /// The first header ending in `ft` (ft), or containing `gmro` or `idw`
    /// (gmro, Id/W), is taken, ignoring case. The length and gm/Id columns
    /// keep their standard names.
    pub fn discover<S: AsRef<str>>(headers: &[S], quantity: Quantity) -> Result<Self> {
        let is_value_column = |header: &str| {
            let header = header.to_ascii_lowercase();
            match quantity {
                Quantity::Ft => header.ends_with("ft"),
                Quantity::Gmro => header.contains("gmro"),
                Quantity::IdW => header.contains("idw"),
            }
        };

        headers
            .iter()
            .map(AsRef::<str>::as_ref)
            .find(|&h| is_value_column(h))
            .map(|value| Self::new(LENGTH_COLUMN, GM_ID_COLUMN, value))
            .ok_or_else(|| Error::UndiscoverableColumn {
                quantity,
                headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            })
    }

    /// Positions of the `[length, gm_id, value]` columns in `headers`.
    pub(crate) fn indices(&self, headers: &StringRecord) -> Result<[usize; 3]> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| Error::MissingColumn {
                    column: column.to_string(),
                    headers: headers.iter().map(str::to_string).collect(),
                })
        };
        Ok([find(&self.length)?, find(&self.gm_id)?, find(&self.value)?])
    }
}

/// How the loader picks columns when none are given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPolicy {
    /// [`ColumnSchema::for_quantity`].
    #[default]
    Standard,
    /// [`ColumnSchema::discover`].
    Discover,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_names() {
        let schema = ColumnSchema::for_quantity(Quantity::Gmro);
        assert_eq!(schema, ColumnSchema::new("length_nm", "ngm_id", "ngmro"));
    }

    #[test]
    fn test_discover() {
        let headers = ["length_nm", "ngm_id", "NGMRO_vs_gm"];
        let schema = ColumnSchema::discover(&headers, Quantity::Gmro).unwrap();
        assert_eq!(schema.value, "NGMRO_vs_gm");

        let headers = ["length_nm", "ngm_id", "nfT"];
        assert_eq!(
            ColumnSchema::discover(&headers, Quantity::Ft).unwrap().value,
            "nfT"
        );

        let err = ColumnSchema::discover(&headers, Quantity::IdW).unwrap_err();
        assert!(matches!(
            err,
            Error::UndiscoverableColumn {
                quantity: Quantity::IdW,
                ..
            }
        ));
    }

    #[test]
    fn test_indices() {
        let headers = StringRecord::from(vec!["nidw", "ngm_id", "length_nm"]);
        let schema = ColumnSchema::for_quantity(Quantity::IdW);
        assert_eq!(schema.indices(&headers).unwrap(), [2, 1, 0]);

        let schema = ColumnSchema::for_quantity(Quantity::Ft);
        assert!(matches!(
            schema.indices(&headers),
            Err(Error::MissingColumn { ref column, .. }) if column == "nft"
        ));
    }

    #[test]
    fn test_policy_names() {
        let policy: ColumnPolicy = serde_json::from_str(r#""discover""#).unwrap();
        assert_eq!(policy, ColumnPolicy::Discover);
    }
}
