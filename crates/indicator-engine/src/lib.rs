//! Grouped Statistics Engine
//!
//! Computes the causal per-series indicators: day-over-day inflation, short and
//! long moving averages, volatility, the moving-average crossover signal and RSI.

mod config;
mod engine;
mod statistics;

pub use config::IndicatorConfig;
pub use engine::IndicatorEngine;
pub use statistics::{crossovers, daily_inflation, rsi};
