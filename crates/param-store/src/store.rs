//! Order Table

use crate::ParamStoreError;
use price_series::{ArimaOrder, GroupKey, ModelOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One row of the order file, fields still text
#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(alias = "producto")]
    product_id: Option<String>,
    #[serde(alias = "ciudad")]
    city_id: Option<String>,
    p: Option<String>,
    d: Option<String>,
    q: Option<String>,
}

/// What happened while loading an order file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data rows read
    pub rows: usize,
    /// Orders stored
    pub loaded: usize,
    /// Rows with a blank key or an unusable p/d/q
    pub skipped_invalid: usize,
    /// Rows repeating an earlier key
    pub duplicates: usize,
}

/// Read-only (product, city) -> ARIMA order table
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    orders: HashMap<GroupKey, ArimaOrder>,
    report: LoadReport,
}

impl ParamStore {
    /// Create an empty store; every lookup misses
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from in-memory orders. The first order for a key wins.
    pub fn from_orders<I>(orders: I) -> Self
    where
        I: IntoIterator<Item = ModelOrder>,
    {
        let mut store = Self::new();
        for order in orders {
            store.report.rows += 1;
            store.insert(order.key(), order.order());
        }
        store
    }

    /// Load orders from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParamStoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ParamStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_reader(file)?;
        info!(
            "Loaded {} ARIMA orders from {} ({} invalid, {} duplicate rows)",
            store.report.loaded,
            path.display(),
            store.report.skipped_invalid,
            store.report.duplicates
        );
        Ok(store)
    }

    /// Load orders from CSV with headers `product_id, city_id, p, d, q`.
    ///
    /// Extra columns are ignored. Rows whose order is blank or not a
    /// non-negative integer are skipped, as are malformed rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParamStoreError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let has = |names: &[&str]| headers.iter().any(|h| names.contains(&h));
        let mut missing = Vec::new();
        if !has(&["product_id", "producto"]) {
            missing.push("product_id".to_string());
        }
        if !has(&["city_id", "ciudad"]) {
            missing.push("city_id".to_string());
        }
        for column in ["p", "d", "q"] {
            if !has(&[column]) {
                missing.push(column.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(ParamStoreError::MissingColumns(missing));
        }

        let mut store = Self::new();
        for (line, result) in csv_reader.deserialize::<OrderRecord>().enumerate() {
            store.report.rows += 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping malformed order row {}: {}", line + 1, e);
                    store.report.skipped_invalid += 1;
                    continue;
                }
            };

            match Self::parse_record(&record) {
                Some((key, order)) => store.insert(key, order),
                None => store.report.skipped_invalid += 1,
            }
        }

        Ok(store)
    }

    fn parse_record(record: &OrderRecord) -> Option<(GroupKey, ArimaOrder)> {
        let product = record.product_id.as_deref()?;
        let city = record.city_id.as_deref()?;
        let key = GroupKey::new(product, city);
        if key.product_id.is_empty() || key.city_id.is_empty() {
            return None;
        }

        let p = parse_order_term(record.p.as_deref()?)?;
        let d = parse_order_term(record.d.as_deref()?)?;
        let q = parse_order_term(record.q.as_deref()?)?;
        Some((key, ArimaOrder::new(p, d, q)))
    }

    fn insert(&mut self, key: GroupKey, order: ArimaOrder) {
        if self.orders.contains_key(&key) {
            warn!("Duplicate ARIMA order for {}, keeping the first", key);
            self.report.duplicates += 1;
            return;
        }
        self.orders.insert(key, order);
        self.report.loaded += 1;
    }

    /// Order for a series, if one was selected
    pub fn get(&self, key: &GroupKey) -> Option<ArimaOrder> {
        self.orders.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// All stored orders
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &ArimaOrder)> {
        self.orders.iter()
    }

    /// Counters from loading
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }
}

/// Non-negative integer term; float text such as `2.0` is accepted because
/// order columns containing blanks are often written as floats.
fn parse_order_term(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<usize>() {
        return Some(v);
    }
    let v: f64 = raw.parse().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
        Some(v as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_lookup() {
        let data = "\
product_id,city_id,p,d,q
Milk,A,1,0,0
rice,b,2,1,1
";
        let store = ParamStore::from_reader(data.as_bytes()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&GroupKey::new("milk", "a")), Some(ArimaOrder::new(1, 0, 0)));
        assert_eq!(store.get(&GroupKey::new("RICE", "B")), Some(ArimaOrder::new(2, 1, 1)));
        assert_eq!(store.get(&GroupKey::new("bread", "a")), None);
    }

    #[test]
    fn test_original_headers_and_extra_columns() {
        let data = "\
producto,ciudad,trend_slope,p,d,q
leche,bogotá,0.52,5.0,1.0,0.0
arroz,cali,,,,
";
        let store = ParamStore::from_reader(data.as_bytes()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&GroupKey::new("leche", "bogotá")),
            Some(ArimaOrder::new(5, 1, 0))
        );
        assert_eq!(store.load_report().skipped_invalid, 1);
    }

    #[test]
    fn test_invalid_terms_skipped() {
        let data = "\
product_id,city_id,p,d,q
milk,a,-1,0,0
milk,b,1.5,0,0
milk,c,x,0,0
milk,d,1,0,0
";
        let store = ParamStore::from_reader(data.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load_report().skipped_invalid, 3);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let data = "\
product_id,city_id,p,d,q
milk,a,1,0,0
MILK,a,3,1,2
";
        let store = ParamStore::from_reader(data.as_bytes()).unwrap();
        assert_eq!(store.get(&GroupKey::new("milk", "a")), Some(ArimaOrder::new(1, 0, 0)));
        assert_eq!(store.load_report().duplicates, 1);
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let data = "product_id,p,d\nmilk,1,0\n";
        match ParamStore::from_reader(data.as_bytes()) {
            Err(ParamStoreError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["city_id".to_string(), "q".to_string()]);
            }
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = ParamStore::from_path("/definitely/not/here.csv");
        assert!(matches!(result, Err(ParamStoreError::Io { .. })));
    }

    #[test]
    fn test_from_orders() {
        let store = ParamStore::from_orders(vec![ModelOrder {
            product_id: "Milk".to_string(),
            city_id: "A".to_string(),
            p: 1,
            d: 1,
            q: 1,
        }]);
        assert_eq!(store.get(&GroupKey::new("milk", "a")), Some(ArimaOrder::new(1, 1, 1)));
        assert!(ParamStore::new().is_empty());
    }
}
