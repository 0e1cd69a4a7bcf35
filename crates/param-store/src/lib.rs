//! ARIMA Parameter Store
//!
//! Holds the (p, d, q) order selected offline for each (product, city) series.
//! Built once per run and only ever read; a series without an entry is a
//! normal state that simply gets no forecast.

mod error;
mod store;

pub use error::ParamStoreError;
pub use store::{LoadReport, ParamStore};
