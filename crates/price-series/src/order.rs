//! Forecasting Model Orders

use crate::GroupKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIMA (p, d, q) order for one series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive terms
    pub p: usize,
    /// Differencing passes
    pub d: usize,
    /// Moving-average terms
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Shortest series the forecaster will attempt to fit
    pub fn min_series_len(&self) -> usize {
        self.p.max(self.d).max(self.q) + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Offline-selected order for one (product, city) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOrder {
    pub product_id: String,
    pub city_id: String,
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ModelOrder {
    /// Key of the series this order belongs to
    pub fn key(&self) -> GroupKey {
        GroupKey::new(&self.product_id, &self.city_id)
    }

    pub fn order(&self) -> ArimaOrder {
        ArimaOrder::new(self.p, self.d, self.q)
    }
}
