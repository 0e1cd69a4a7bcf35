//! ARIMA Trend Forecasting
//!
//! Fits each series with the ARIMA order chosen for it offline, forecasts one
//! step ahead and reports the difference from the last observed price. Failure
//! is an ordinary outcome: a series without an order, with too little history
//! or whose fit breaks down simply gets no trend slope.

mod arima;
mod forecaster;
pub mod search;

pub use arima::{difference, ArimaModel};
pub use forecaster::{
    ForecastOutcome, ForecastSummary, NoForecastReason, TrendForecast, TrendForecaster,
};

use thiserror::Error;

/// Errors fitting an ARIMA model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArimaError {
    #[error("Too few observations to fit: need {required}, have {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("Series contains non-finite values")]
    InvalidData,
    #[error("Regression is singular (degenerate series)")]
    Singular,
    #[error("Fit produced non-finite values")]
    NonFinite,
}
