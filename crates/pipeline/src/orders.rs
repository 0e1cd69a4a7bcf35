//! Offline Order Selection Output

use crate::PipelineError;
use price_series::{group_ranges, Grouped, Observation};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use storage::StorageError;
use tracing::{info, warn};
use trend_forecast::search::{OrderSearch, SearchConfig, SearchSummary};

/// One line of the order table; order fields are empty when no model fit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    pub product_id: String,
    pub city_id: String,
    pub trend_slope: Option<f64>,
    pub p: Option<usize>,
    pub d: Option<usize>,
    pub q: Option<usize>,
}

/// Search an order for every series of cleaned, sorted observations
pub fn search_orders(
    observations: &[Observation],
    config: &SearchConfig,
) -> (Vec<OrderRow>, SearchSummary) {
    let search = OrderSearch::new(config.clone());
    let mut summary = SearchSummary::default();
    let mut rows = Vec::new();

    for range in group_ranges(observations) {
        let series = &observations[range];
        let key = series[0].group_key();
        let prices: Vec<f64> = series.iter().map(|o| o.average_price).collect();

        let result = search.search(&prices);
        summary.record(&result);

        let row = match result {
            Ok(found) => {
                info!("{}: {} (AIC {:.2})", key, found.order, found.aic);
                OrderRow {
                    product_id: key.product_id,
                    city_id: key.city_id,
                    trend_slope: Some(found.trend_slope),
                    p: Some(found.order.p),
                    d: Some(found.order.d),
                    q: Some(found.order.q),
                }
            }
            Err(e) => {
                warn!("{}: no usable order: {}", key, e);
                OrderRow {
                    product_id: key.product_id,
                    city_id: key.city_id,
                    trend_slope: None,
                    p: None,
                    d: None,
                    q: None,
                }
            }
        };
        rows.push(row);
    }

    info!(
        "Order search: {} series, {} selected, {} failed",
        summary.groups, summary.selected, summary.failed
    );
    (rows, summary)
}

/// Write the order table to a CSV file
pub fn write_orders(path: impl AsRef<Path>, rows: &[OrderRow]) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_orders_to(file, rows)
}

/// Write the order table as CSV with a header row
pub fn write_orders_to<W: Write>(writer: W, rows: &[OrderRow]) -> Result<(), PipelineError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use param_store::ParamStore;
    use price_series::{ArimaOrder, GroupKey};

    fn observations(product: &str, prices: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Observation::new(product, "a", start + Duration::days(i as i64), p))
            .collect()
    }

    #[test]
    fn test_orders_round_trip_through_store() {
        let prices: Vec<f64> = (0..40).map(|t| 100.0 + t as f64 + (t % 4) as f64).collect();
        let obs = observations("milk", &prices);
        let config = SearchConfig {
            max_p: 2,
            max_d: 1,
            max_q: 1,
        };

        let (rows, summary) = search_orders(&obs, &config);
        assert_eq!(summary.selected, 1);
        assert_eq!(rows[0].product_id, "milk");

        let mut out = Vec::new();
        write_orders_to(&mut out, &rows).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("product_id,city_id,trend_slope,p,d,q"));

        let store = ParamStore::from_reader(out.as_slice()).unwrap();
        let order = store.get(&GroupKey::new("milk", "a")).unwrap();
        assert_eq!(
            order,
            ArimaOrder::new(rows[0].p.unwrap(), rows[0].d.unwrap(), rows[0].q.unwrap())
        );
    }

    #[test]
    fn test_failed_search_writes_empty_order() {
        let rows = vec![OrderRow {
            product_id: "salt".to_string(),
            city_id: "a".to_string(),
            trend_slope: None,
            p: None,
            d: None,
            q: None,
        }];
        let mut out = Vec::new();
        write_orders_to(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "product_id,city_id,trend_slope,p,d,q\nsalt,a,,,,\n"
        );
    }
}
