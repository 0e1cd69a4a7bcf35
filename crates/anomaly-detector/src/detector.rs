//! Rolling Z-Score Detector

use price_series::DerivedRow;
use rolling_window::RollingWindow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// |z| above this marks an anomaly. Fixed policy, not part of the config.
pub const Z_SCORE_THRESHOLD: f64 = 2.0;

/// Anomaly detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Trailing window size (observations)
    pub window: usize,
    /// Observations required before a z-score is defined
    pub min_periods: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window: 50,
            min_periods: 10,
        }
    }
}

/// Trailing z-scores with population standard deviation.
///
/// `None` during warm-up and wherever the window has zero spread.
pub fn rolling_z_scores(prices: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    let min_periods = min_periods.max(1);
    let mut win = RollingWindow::new(window);

    prices
        .iter()
        .map(|&price| {
            win.push(price);
            if win.len() < min_periods {
                return None;
            }
            let mean = win.mean()?;
            let std = win.std_dev(0)?;
            if std > 0.0 {
                Some((price - mean) / std)
            } else {
                None
            }
        })
        .collect()
}

/// Fills `z_score` and `anomaly` for one series
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    /// Create a new detector
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Whether a z-score counts as anomalous
    pub fn is_anomaly(z_score: Option<f64>) -> bool {
        matches!(z_score, Some(z) if z.abs() > Z_SCORE_THRESHOLD)
    }

    /// Score one series in place, returning how many rows were flagged
    pub fn apply(&self, series: &mut [DerivedRow]) -> usize {
        let prices: Vec<f64> = series.iter().map(DerivedRow::price).collect();
        let scores = rolling_z_scores(&prices, self.config.window, self.config.min_periods);

        let mut flagged = 0;
        for (row, z) in series.iter_mut().zip(scores) {
            row.z_score = z;
            row.anomaly = Self::is_anomaly(z);
            if row.anomaly {
                flagged += 1;
            }
        }

        if flagged > 0 {
            debug!(
                "{}/{}: {} anomalies in {} rows",
                series[0].product_id,
                series[0].city_id,
                flagged,
                series.len()
            );
        }
        flagged
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(AnomalyConfig::default())
    }
}
