//! Reading sweep CSVs into sample rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use lutmos_core::{Quantity, SampleRow};

use crate::error::{Error, Result};
use crate::schema::{ColumnPolicy, ColumnSchema};

/// Read rows from CSV data with the given column layout.
///
/// Empty and `NaN` cells count as missing and their row is dropped. Any other
/// unparseable cell is an error naming its line and column.
pub fn read_rows<R: Read>(reader: R, schema: &ColumnSchema) -> Result<Vec<SampleRow>> {
    read_with(reader, |_| Ok(schema.clone()))
}

/// Read rows, picking the value column with [`ColumnSchema::discover`].
pub fn read_rows_discovering<R: Read>(reader: R, quantity: Quantity) -> Result<Vec<SampleRow>> {
    read_with(reader, |headers| {
        let headers: Vec<&str> = headers.iter().collect();
        ColumnSchema::discover(&headers, quantity)
    })
}

/// Read one quantity's CSV file.
pub fn read_file(path: &Path, quantity: Quantity, policy: ColumnPolicy) -> Result<Vec<SampleRow>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = match policy {
        ColumnPolicy::Standard => read_rows(file, &ColumnSchema::for_quantity(quantity))?,
        ColumnPolicy::Discover => read_rows_discovering(file, quantity)?,
    };
    log::info!("read {} {} rows from {}", rows.len(), quantity, path.display());
    Ok(rows)
}

fn read_with<R, F>(reader: R, schema_for: F) -> Result<Vec<SampleRow>>
where
    R: Read,
    F: FnOnce(&StringRecord) -> Result<ColumnSchema>,
{
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let schema = schema_for(&headers)?;
    let [length_idx, gm_id_idx, value_idx] = schema.indices(&headers)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let cell = |idx: usize, column: &str| parse_cell(record.get(idx).unwrap_or(""), line, column);

        let length = cell(length_idx, &schema.length)?;
        let gm_id = cell(gm_id_idx, &schema.gm_id)?;
        let value = cell(value_idx, &schema.value)?;
        match (gm_id, length, value) {
            (Some(gm_id), Some(length), Some(value)) => {
                rows.push(SampleRow::new(gm_id, length, value))
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("dropped {} rows with missing cells", dropped);
    }
    Ok(rows)
}

fn parse_cell(text: &str, line: u64, column: &str) -> Result<Option<f64>> {
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| Error::BadNumber {
            line,
            column: column.to_string(),
            text: text.to_string(),
        })
}
