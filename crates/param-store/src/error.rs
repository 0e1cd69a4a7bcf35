//! Parameter Store Errors

use thiserror::Error;

/// Errors loading the order table. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum ParamStoreError {
    /// File could not be opened
    #[error("Failed to open parameter file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Header lacks a required column
    #[error("Parameter file is missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// Header could not be read
    #[error("Malformed parameter file: {0}")]
    Csv(#[from] csv::Error),
}
