//! Per-Series Fit and Forecast

use crate::{ArimaError, ArimaModel};
use param_store::ParamStore;
use price_series::{ArimaOrder, DerivedRow, GroupKey, Grouped};
use serde::Serialize;
use tracing::{debug, warn};

/// A successful one-step forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendForecast {
    pub order: ArimaOrder,
    /// Forecast of the next price
    pub next: f64,
    /// Last observed price
    pub last: f64,
    /// `next - last`
    pub slope: f64,
}

/// Why a series got no forecast
#[derive(Debug, Clone, PartialEq)]
pub enum NoForecastReason {
    /// No order was selected for the series
    MissingOrder,
    /// Fewer observations than the order needs
    InsufficientHistory { required: usize, actual: usize },
    /// The fit itself failed
    FitFailed(ArimaError),
}

/// Result of forecasting one series
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Forecast(TrendForecast),
    NoForecast(NoForecastReason),
}

impl ForecastOutcome {
    /// Trend slope, if a forecast was produced
    pub fn slope(&self) -> Option<f64> {
        match self {
            ForecastOutcome::Forecast(f) => Some(f.slope),
            ForecastOutcome::NoForecast(_) => None,
        }
    }

    pub fn is_forecast(&self) -> bool {
        matches!(self, ForecastOutcome::Forecast(_))
    }
}

/// Forecast counts over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForecastSummary {
    pub groups: usize,
    pub forecast_ok: usize,
    pub missing_order: usize,
    pub insufficient_history: usize,
    pub fit_failed: usize,
}

impl ForecastSummary {
    pub fn record(&mut self, outcome: &ForecastOutcome) {
        self.groups += 1;
        match outcome {
            ForecastOutcome::Forecast(_) => self.forecast_ok += 1,
            ForecastOutcome::NoForecast(NoForecastReason::MissingOrder) => {
                self.missing_order += 1
            }
            ForecastOutcome::NoForecast(NoForecastReason::InsufficientHistory { .. }) => {
                self.insufficient_history += 1
            }
            ForecastOutcome::NoForecast(NoForecastReason::FitFailed(_)) => self.fit_failed += 1,
        }
    }
}

/// Fits each series with its stored order
pub struct TrendForecaster<'a> {
    store: &'a ParamStore,
}

impl<'a> TrendForecaster<'a> {
    pub fn new(store: &'a ParamStore) -> Self {
        Self { store }
    }

    /// Fit `order` on `prices` and forecast one step ahead
    pub fn fit_and_forecast(order: ArimaOrder, prices: &[f64]) -> ForecastOutcome {
        let required = order.min_series_len();
        if prices.len() < required {
            return ForecastOutcome::NoForecast(NoForecastReason::InsufficientHistory {
                required,
                actual: prices.len(),
            });
        }

        match ArimaModel::fit(prices, order) {
            Ok(model) => {
                let next = model.forecast_next();
                let last = model.last_observed();
                if !next.is_finite() {
                    return ForecastOutcome::NoForecast(NoForecastReason::FitFailed(
                        ArimaError::NonFinite,
                    ));
                }
                ForecastOutcome::Forecast(TrendForecast {
                    order,
                    next,
                    last,
                    slope: next - last,
                })
            }
            Err(e) => ForecastOutcome::NoForecast(NoForecastReason::FitFailed(e)),
        }
    }

    /// Forecast the series identified by `key`
    pub fn forecast(&self, key: &GroupKey, prices: &[f64]) -> ForecastOutcome {
        match self.store.get(key) {
            Some(order) => Self::fit_and_forecast(order, prices),
            None => ForecastOutcome::NoForecast(NoForecastReason::MissingOrder),
        }
    }

    /// Forecast one series and write the slope onto every row
    pub fn apply(&self, series: &mut [DerivedRow]) -> ForecastOutcome {
        let Some(first) = series.first() else {
            return ForecastOutcome::NoForecast(NoForecastReason::InsufficientHistory {
                required: 1,
                actual: 0,
            });
        };
        let key = first.group_key();
        let prices: Vec<f64> = series.iter().map(DerivedRow::price).collect();

        let outcome = self.forecast(&key, &prices);
        match &outcome {
            ForecastOutcome::Forecast(f) => {
                debug!("{} {}: next {:.4}, slope {:.4}", key, f.order, f.next, f.slope)
            }
            ForecastOutcome::NoForecast(NoForecastReason::MissingOrder) => {
                debug!("{}: no ARIMA order, skipping forecast", key)
            }
            ForecastOutcome::NoForecast(NoForecastReason::InsufficientHistory {
                required,
                actual,
            }) => warn!(
                "{}: {} observations, {} required for forecast",
                key, actual, required
            ),
            ForecastOutcome::NoForecast(NoForecastReason::FitFailed(e)) => {
                warn!("{}: ARIMA fit failed: {}", key, e)
            }
        }

        let slope = outcome.slope();
        for row in series.iter_mut() {
            row.trend_slope = slope;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use price_series::{ModelOrder, Observation};

    fn series(product: &str, prices: &[f64]) -> Vec<DerivedRow> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                DerivedRow::from(Observation::new(
                    product,
                    "a",
                    start + Duration::days(i as i64),
                    p,
                ))
            })
            .collect()
    }

    fn store(product: &str, p: usize, d: usize, q: usize) -> ParamStore {
        ParamStore::from_orders(vec![ModelOrder {
            product_id: product.to_string(),
            city_id: "a".to_string(),
            p,
            d,
            q,
        }])
    }

    #[test]
    fn test_increasing_series_has_positive_slope() {
        let store = store("milk", 1, 0, 0);
        let mut rows = series("milk", &[100.0, 101.0, 103.0, 104.0, 106.0, 107.0]);

        let outcome = TrendForecaster::new(&store).apply(&mut rows);

        let slope = outcome.slope().unwrap();
        assert!(slope > 0.0);
        assert!(rows.iter().all(|r| r.trend_slope == Some(slope)));
    }

    #[test]
    fn test_missing_order_leaves_slope_empty() {
        let store = store("milk", 1, 0, 0);
        let mut rows = series("bread", &[1.0, 2.0, 3.0, 4.0, 5.0]);

        let outcome = TrendForecaster::new(&store).apply(&mut rows);

        assert_eq!(outcome, ForecastOutcome::NoForecast(NoForecastReason::MissingOrder));
        assert!(rows.iter().all(|r| r.trend_slope.is_none()));
    }

    #[test]
    fn test_short_series() {
        let store = store("milk", 3, 1, 0);
        let mut rows = series("milk", &[1.0, 2.0, 3.0]);

        let outcome = TrendForecaster::new(&store).apply(&mut rows);

        assert_eq!(
            outcome,
            ForecastOutcome::NoForecast(NoForecastReason::InsufficientHistory {
                required: 4,
                actual: 3
            })
        );
        assert!(rows.iter().all(|r| r.trend_slope.is_none()));
    }

    #[test]
    fn test_degenerate_series_fails_gracefully() {
        let store = store("milk", 2, 0, 0);
        let mut rows = series("milk", &[50.0; 20]);

        let outcome = TrendForecaster::new(&store).apply(&mut rows);

        assert!(matches!(
            outcome,
            ForecastOutcome::NoForecast(NoForecastReason::FitFailed(_))
        ));
        assert!(rows.iter().all(|r| r.trend_slope.is_none()));
    }

    #[test]
    fn test_random_walk_slope_is_zero() {
        let outcome = TrendForecaster::fit_and_forecast(ArimaOrder::new(0, 1, 0), &[3.0, 5.0, 4.0]);
        match outcome {
            ForecastOutcome::Forecast(f) => {
                assert_eq!(f.last, 4.0);
                assert_eq!(f.slope, 0.0);
            }
            other => panic!("expected forecast, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ForecastSummary::default();
        summary.record(&ForecastOutcome::NoForecast(NoForecastReason::MissingOrder));
        summary.record(&ForecastOutcome::NoForecast(NoForecastReason::FitFailed(
            ArimaError::Singular,
        )));
        summary.record(&TrendForecaster::fit_and_forecast(
            ArimaOrder::new(0, 0, 0),
            &[1.0, 2.0],
        ));

        assert_eq!(summary.groups, 3);
        assert_eq!(summary.forecast_ok, 1);
        assert_eq!(summary.missing_order, 1);
        assert_eq!(summary.fit_failed, 1);
    }
}
