//! Offline ARIMA Order Search
//!
//! Picks `d` with repeated KPSS level-stationarity tests, then fits every
//! (p, q) pair up to the configured maxima and keeps the lowest AIC. Every
//! candidate is scored on the same residual sample, starting `max_p + max_q`
//! steps into the differenced series. This is far too slow for the online
//! path; its output feeds the parameter store.

use crate::{difference, ArimaError, ArimaModel};
use price_series::ArimaOrder;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 5% critical value of the KPSS level-stationarity statistic
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

/// Order search limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_p: 10,
            max_d: 1,
            max_q: 5,
        }
    }
}

/// KPSS statistic for level stationarity.
///
/// Uses the Bartlett-weighted long-run variance with `floor(3 * sqrt(n) / 13)`
/// lags. `None` for fewer than two points or a series with no variance.
pub fn kpss_level(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    let resid: Vec<f64> = data.iter().map(|x| x - mean).collect();

    let mut partial = 0.0;
    let mut eta = 0.0;
    for e in &resid {
        partial += e;
        eta += partial * partial;
    }
    eta /= nf * nf;

    let lags = ((3.0 * nf.sqrt() / 13.0).floor() as usize).min(n - 1);
    let mut long_run = resid.iter().map(|e| e * e).sum::<f64>() / nf;
    for lag in 1..=lags {
        let weight = 1.0 - lag as f64 / (lags as f64 + 1.0);
        let cov: f64 = (lag..n).map(|t| resid[t] * resid[t - lag]).sum::<f64>() / nf;
        long_run += 2.0 * weight * cov;
    }

    if long_run > 0.0 {
        Some(eta / long_run)
    } else {
        None
    }
}

/// Number of differences needed for level stationarity, up to `max_d`
pub fn ndiffs(data: &[f64], max_d: usize) -> usize {
    let mut d = 0;
    let mut series = data.to_vec();
    while d < max_d {
        match kpss_level(&series) {
            Some(stat) if stat > KPSS_CRITICAL_5PCT => {
                d += 1;
                series = difference(&series, 1);
            }
            _ => break,
        }
    }
    d
}

/// Best order found for one series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub order: ArimaOrder,
    pub aic: f64,
    /// One-step forecast minus last price under the chosen order
    pub trend_slope: f64,
}

/// Counts over a search run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub groups: usize,
    pub selected: usize,
    pub failed: usize,
}

impl SearchSummary {
    pub fn record(&mut self, result: &Result<SearchResult, ArimaError>) {
        self.groups += 1;
        if result.is_ok() {
            self.selected += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// AIC grid search over ARIMA orders
pub struct OrderSearch {
    config: SearchConfig,
}

impl OrderSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// First differenced index scored for every candidate
    fn scoring_start(&self, differenced_len: usize) -> usize {
        (self.config.max_p + self.config.max_q).min(differenced_len.saturating_sub(1))
    }

    /// Select the order with the lowest AIC for `prices`
    pub fn search(&self, prices: &[f64]) -> Result<SearchResult, ArimaError> {
        if prices.iter().any(|v| !v.is_finite()) {
            return Err(ArimaError::InvalidData);
        }

        let d = ndiffs(prices, self.config.max_d);
        let start = self.scoring_start(prices.len().saturating_sub(d));
        debug!("d = {}, scoring residuals from {}", d, start);
        let mut best: Option<(ArimaModel, f64)> = None;
        let mut last_error = ArimaError::InsufficientData {
            required: d + 1,
            actual: prices.len(),
        };

        for p in 0..=self.config.max_p {
            for q in 0..=self.config.max_q {
                let order = ArimaOrder::new(p, d, q);
                if prices.len() < order.min_series_len() {
                    continue;
                }
                match ArimaModel::fit(prices, order) {
                    Ok(model) => {
                        let aic = match model.aic_from(start) {
                            Some(aic) if aic.is_finite() => aic,
                            _ => continue,
                        };
                        if best.as_ref().map_or(true, |(_, best_aic)| aic < *best_aic) {
                            best = Some((model, aic));
                        }
                    }
                    Err(e) => {
                        debug!("{} rejected: {}", order, e);
                        last_error = e;
                    }
                }
            }
        }

        let (model, aic) = best.ok_or(last_error)?;
        let trend_slope = model.forecast_next() - model.last_observed();
        Ok(SearchResult {
            order: model.order(),
            aic,
            trend_slope,
        })
    }
}

impl Default for OrderSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|t| 10.0 + (2.0 * std::f64::consts::PI * t as f64 / 7.0).sin())
            .collect()
    }

    #[test]
    fn test_kpss_trend_is_not_stationary() {
        let trend: Vec<f64> = (0..100).map(|t| t as f64).collect();
        assert!(kpss_level(&trend).unwrap() > KPSS_CRITICAL_5PCT);
    }

    #[test]
    fn test_kpss_wave_is_stationary() {
        assert!(kpss_level(&wave(100)).unwrap() < KPSS_CRITICAL_5PCT);
    }

    #[test]
    fn test_kpss_degenerate() {
        assert_eq!(kpss_level(&[1.0]), None);
        assert_eq!(kpss_level(&[3.0; 10]), None);
    }

    #[test]
    fn test_ndiffs() {
        let trend: Vec<f64> = (0..100).map(|t| t as f64 * 0.5).collect();
        assert_eq!(ndiffs(&trend, 1), 1);
        assert_eq!(ndiffs(&trend, 0), 0);
        assert_eq!(ndiffs(&wave(100), 1), 0);
    }

    #[test]
    fn test_search_prefers_fitting_order() {
        let search = OrderSearch::new(SearchConfig {
            max_p: 2,
            max_d: 1,
            max_q: 1,
        });
        let result = search.search(&wave(60)).unwrap();

        assert_eq!(result.order.d, 0);
        assert!(result.order.p >= 1);
        let white_noise = ArimaModel::fit(&wave(60), ArimaOrder::new(0, 0, 0)).unwrap();
        assert!(result.aic <= white_noise.aic_from(3).unwrap());
    }

    #[test]
    fn test_white_noise_selects_no_ar_terms() {
        // Uniform noise around 4000 with a standard deviation near 11.5
        let mut state: u64 = 11;
        let prices: Vec<f64> = (0..120)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                4000.0 + 40.0 * ((state >> 11) as f64 / (1u64 << 53) as f64 - 0.5)
            })
            .collect();

        let result = OrderSearch::default().search(&prices).unwrap();
        assert_eq!(result.order.d, 0);
        assert_eq!(result.order.p, 0);
    }

    #[test]
    fn test_search_on_trend_differences() {
        let trend: Vec<f64> = (0..80).map(|t| 100.0 + t as f64 + (t % 3) as f64).collect();
        let result = OrderSearch::default().search(&trend).unwrap();

        assert_eq!(result.order.d, 1);
        assert!(result.trend_slope.is_finite());
    }

    #[test]
    fn test_search_too_short() {
        let result = OrderSearch::default().search(&[]);
        assert!(matches!(result, Err(ArimaError::InsufficientData { .. })));
    }

    #[test]
    fn test_summary() {
        let mut summary = SearchSummary::default();
        summary.record(&OrderSearch::default().search(&wave(30)));
        summary.record(&Err(ArimaError::Singular));
        assert_eq!(summary, SearchSummary { groups: 2, selected: 1, failed: 1 });
    }
}
