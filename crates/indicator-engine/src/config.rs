//! Indicator configuration

use serde::{Deserialize, Serialize};

/// Window sizes for the per-series indicators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Short moving average window (observations)
    pub short_window: usize,

    /// Long moving average window (observations)
    pub long_window: usize,

    /// Volatility window (observations)
    pub volatility_window: usize,

    /// Observations required before volatility is defined
    pub volatility_min_periods: usize,

    /// RSI averaging window (observations)
    pub rsi_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 50,
            volatility_window: 30,
            volatility_min_periods: 2,
            rsi_window: 14,
        }
    }
}
