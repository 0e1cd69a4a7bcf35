//! Storage Layer
//!
//! Reads raw price rows from delimited files, writes enriched rows back out and
//! serves the latest-per-series and history queries presentation code needs.

mod files;
mod repository;

pub use files::{
    read_raw_records, read_raw_records_from, write_derived, write_derived_to, REQUIRED_COLUMNS,
};
pub use repository::Repository;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
