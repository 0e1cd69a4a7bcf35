//! Enriched Output Row

use crate::{Grouped, Observation};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// RSI momentum zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    /// RSI above 70
    Overbought,
    /// RSI below 30
    Oversold,
    /// Anything else, including an undefined RSI
    #[default]
    Neutral,
}

impl RsiZone {
    /// Classify an RSI value
    pub fn classify(rsi: Option<f64>) -> Self {
        match rsi {
            Some(v) if v > 70.0 => RsiZone::Overbought,
            Some(v) if v < 30.0 => RsiZone::Oversold,
            _ => RsiZone::Neutral,
        }
    }
}

/// One observation plus every signal derived for it.
///
/// Kept flat so it serializes to a single delimited row. Pipeline stages fill
/// their own columns in place; a fresh row has every derived value unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub product_id: String,
    pub city_id: String,
    pub capture_date: NaiveDate,
    pub creation_date: Option<NaiveDate>,
    pub average_price: f64,

    /// Percent change from the previous observation of the series
    pub daily_inflation: Option<f64>,
    /// Trailing mean over the short window
    pub short_ma: f64,
    /// Trailing mean over the long window
    pub long_ma: f64,
    /// Trailing sample standard deviation
    pub volatility: Option<f64>,
    /// 1 when short_ma > long_ma
    pub signal: u8,
    /// signal[i] - signal[i-1]
    pub crossover: Option<i8>,
    pub rsi: Option<f64>,
    pub rsi_zone: RsiZone,

    pub z_score: Option<f64>,
    pub anomaly: bool,

    /// One-step forecast minus the last observed price of the series
    pub trend_slope: Option<f64>,

    pub prev_price: Option<f64>,
    pub price_drop: bool,
    /// Mean price of this (product, city, month-of-year) over the full history
    pub monthly_avg: f64,
    /// monthly_avg relative to the series mean, x100
    pub seasonal_index: f64,
}

impl DerivedRow {
    /// Price of the underlying observation
    pub fn price(&self) -> f64 {
        self.average_price
    }

    /// Month of year (1-12)
    pub fn month(&self) -> u32 {
        self.capture_date.month()
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.capture_date.year()
    }

    /// The underlying observation
    pub fn observation(&self) -> Observation {
        Observation {
            product_id: self.product_id.clone(),
            city_id: self.city_id.clone(),
            capture_date: self.capture_date,
            creation_date: self.creation_date,
            average_price: self.average_price,
        }
    }
}

impl From<Observation> for DerivedRow {
    fn from(obs: Observation) -> Self {
        Self {
            product_id: obs.product_id,
            city_id: obs.city_id,
            capture_date: obs.capture_date,
            creation_date: obs.creation_date,
            average_price: obs.average_price,
            daily_inflation: None,
            short_ma: obs.average_price,
            long_ma: obs.average_price,
            volatility: None,
            signal: 0,
            crossover: None,
            rsi: None,
            rsi_zone: RsiZone::Neutral,
            z_score: None,
            anomaly: false,
            trend_slope: None,
            prev_price: None,
            price_drop: false,
            monthly_avg: obs.average_price,
            seasonal_index: 100.0,
        }
    }
}

impl Grouped for DerivedRow {
    fn product_id(&self) -> &str {
        &self.product_id
    }

    fn city_id(&self) -> &str {
        &self.city_id
    }
}
