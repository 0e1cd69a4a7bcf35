//! Row-Level Cleaning Errors

use thiserror::Error;

/// Reason a raw row was dropped during cleaning.
///
/// These never abort a run; the normalizer counts them in the
/// [`CleaningReport`](crate::CleaningReport) and moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CleaningError {
    /// Required field absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Date text that matches no supported format
    #[error("Unparseable {field}: {value:?}")]
    UnparseableDate { field: &'static str, value: String },

    /// Price that is not a finite, non-negative number
    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    /// Identifier that is empty after trimming
    #[error("Empty identifier: {0}")]
    EmptyIdentifier(&'static str),

    /// Zero price with no earlier price to carry forward
    #[error("Zero price with no prior value to forward-fill")]
    Unfillable,

    /// Exact copy of an earlier row
    #[error("Duplicate row")]
    Duplicate,
}
