//! Raw Input Row

use price_series::Observation;
use serde::{Deserialize, Serialize};

/// One row of input as read from a delimited file, every field still text.
///
/// Aliases accept the original Spanish column headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "producto")]
    pub product_id: Option<String>,
    #[serde(alias = "ciudad")]
    pub city_id: Option<String>,
    #[serde(alias = "fechaCaptura")]
    pub capture_date: Option<String>,
    #[serde(alias = "fechaCreacion")]
    pub creation_date: Option<String>,
    #[serde(alias = "precioPromedio")]
    pub average_price: Option<String>,
}

impl RawRecord {
    /// Build a record from string slices (test and adapter convenience)
    pub fn new(product: &str, city: &str, capture_date: &str, price: &str) -> Self {
        Self {
            product_id: Some(product.to_string()),
            city_id: Some(city.to_string()),
            capture_date: Some(capture_date.to_string()),
            creation_date: None,
            average_price: Some(price.to_string()),
        }
    }
}

impl From<&Observation> for RawRecord {
    fn from(obs: &Observation) -> Self {
        Self {
            product_id: Some(obs.product_id.clone()),
            city_id: Some(obs.city_id.clone()),
            capture_date: Some(obs.capture_date.format("%Y-%m-%d").to_string()),
            creation_date: obs
                .creation_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            average_price: Some(obs.average_price.to_string()),
        }
    }
}
