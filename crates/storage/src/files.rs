//! Delimited File Input and Output

use crate::StorageError;
use data_cleaner::RawRecord;
use price_series::DerivedRow;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Input columns, each with the header names accepted for it
pub const REQUIRED_COLUMNS: [(&str, &str); 5] = [
    ("product_id", "producto"),
    ("city_id", "ciudad"),
    ("capture_date", "fechaCaptura"),
    ("creation_date", "fechaCreacion"),
    ("average_price", "precioPromedio"),
];

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read raw rows from a CSV file
pub fn read_raw_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, StorageError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let records = read_raw_records_from(file)?;
    info!("Read {} raw rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read raw rows from any CSV source.
///
/// The header must name every required column. Rows that cannot be decoded
/// are skipped; field-level problems are left to the normalizer.
pub fn read_raw_records_from<R: Read>(reader: R) -> Result<Vec<RawRecord>, StorageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|(name, alias)| !headers.iter().any(|h| h == *name || h == *alias))
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StorageError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (line, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping undecodable row {}: {}", line + 1, e),
        }
    }
    Ok(records)
}

/// Write enriched rows to a CSV file
pub fn write_derived(path: impl AsRef<Path>, rows: &[DerivedRow]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    write_derived_to(file, rows)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write enriched rows as CSV with a header row
pub fn write_derived_to<W: Write>(writer: W, rows: &[DerivedRow]) -> Result<(), StorageError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
