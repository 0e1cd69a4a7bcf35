//! Indicator Assembly for One Series

use crate::statistics::{crossovers, daily_inflation, rsi};
use crate::IndicatorConfig;
use price_series::{DerivedRow, RsiZone};
use rolling_window::{rolling_mean, rolling_std, Ddof};
use tracing::debug;

/// Fills the indicator columns of a single (product, city) series
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    /// Create a new indicator engine
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Compute indicators for one series.
    ///
    /// `series` must hold exactly one group in ascending date order. Every
    /// value written at index `i` is computed from indices `<= i` only.
    pub fn apply(&self, series: &mut [DerivedRow]) {
        if series.is_empty() {
            return;
        }

        let prices: Vec<f64> = series.iter().map(DerivedRow::price).collect();

        let inflation = daily_inflation(&prices);
        let short_ma = rolling_mean(&prices, self.config.short_window, 1);
        let long_ma = rolling_mean(&prices, self.config.long_window, 1);
        let volatility = rolling_std(
            &prices,
            self.config.volatility_window,
            self.config.volatility_min_periods,
            Ddof::Sample,
        );
        let rsi = rsi(&prices, self.config.rsi_window);

        let signals: Vec<u8> = short_ma
            .iter()
            .zip(&long_ma)
            .map(|(s, l)| match (s, l) {
                (Some(s), Some(l)) if s > l => 1,
                _ => 0,
            })
            .collect();
        let cross = crossovers(&signals);

        for (i, row) in series.iter_mut().enumerate() {
            row.daily_inflation = inflation[i];
            // Min period of one: both averages exist at every index
            row.short_ma = short_ma[i].unwrap_or(row.average_price);
            row.long_ma = long_ma[i].unwrap_or(row.average_price);
            row.volatility = volatility[i];
            row.signal = signals[i];
            row.crossover = cross[i];
            row.rsi = rsi[i];
            row.rsi_zone = RsiZone::classify(rsi[i]);
        }

        debug!(
            "Indicators for {}/{}: {} rows, {} crossovers",
            series[0].product_id,
            series[0].city_id,
            series.len(),
            cross.iter().filter(|c| matches!(c, Some(v) if *v != 0)).count()
        );
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}
