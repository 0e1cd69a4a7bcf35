//! Price Data Cleaning
//!
//! Turns loosely typed raw rows into the canonical, sorted observation set the
//! analytics stages run on: day-first date parsing, identifier
//! canonicalization, zero-price forward-fill and duplicate removal.

mod error;
mod filter;
mod normalizer;
mod record;
mod report;
mod validator;

pub use error::CleaningError;
pub use filter::{FillScope, ForwardFill};
pub use normalizer::{CleanOutput, CleanerConfig, Normalizer};
pub use record::RawRecord;
pub use report::CleaningReport;
pub use validator::{parse_date, Validator};
