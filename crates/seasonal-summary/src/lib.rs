//! Seasonal and Price-Drop Summaries
//!
//! Per-series columns (previous price, drop flag, month-of-year average and
//! seasonal index) plus read-only summaries over an enriched series.

mod seasonal;
mod yearly;

pub use seasonal::{price_drops, seasonality_profile, MonthlyProfile, SeasonalSummarizer};
pub use yearly::{yoy_inflation, YearlyInflation};
