//! Cleaned Price Observation

use crate::Grouped;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single cleaned price observation for a product in a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Canonical product identifier (trimmed, lower-case)
    pub product_id: String,
    /// Canonical city identifier (trimmed, lower-case)
    pub city_id: String,
    /// Date the price was captured
    pub capture_date: NaiveDate,
    /// Date the record was created, if it parsed
    pub creation_date: Option<NaiveDate>,
    /// Average observed price, always > 0 once cleaned
    pub average_price: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(
        product_id: impl Into<String>,
        city_id: impl Into<String>,
        capture_date: NaiveDate,
        average_price: f64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            city_id: city_id.into(),
            capture_date,
            creation_date: None,
            average_price,
        }
    }

    /// Month of year (1-12) of the capture date
    pub fn month(&self) -> u32 {
        self.capture_date.month()
    }

    /// Calendar year of the capture date
    pub fn year(&self) -> i32 {
        self.capture_date.year()
    }
}

impl Grouped for Observation {
    fn product_id(&self) -> &str {
        &self.product_id
    }

    fn city_id(&self) -> &str {
        &self.city_id
    }
}
