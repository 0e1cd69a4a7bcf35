//! Year-over-Year Inflation

use price_series::DerivedRow;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean price for one calendar year and its change from the year before
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyInflation {
    pub year: i32,
    pub mean_price: f64,
    /// Percent change versus the previous calendar year; `None` if that year
    /// has no observations
    pub inflation: Option<f64>,
}

/// Year-over-year inflation of one series, by year
pub fn yoy_inflation(series: &[DerivedRow]) -> Vec<YearlyInflation> {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for row in series {
        let entry = sums.entry(row.year()).or_insert((0.0, 0));
        entry.0 += row.price();
        entry.1 += 1;
    }

    let means: BTreeMap<i32, f64> = sums
        .into_iter()
        .map(|(year, (sum, count))| (year, sum / count as f64))
        .collect();

    means
        .iter()
        .map(|(&year, &mean_price)| {
            let inflation = means
                .get(&(year - 1))
                .filter(|prev| **prev > 0.0)
                .map(|prev| (mean_price - prev) / prev * 100.0);
            YearlyInflation {
                year,
                mean_price,
                inflation,
            }
        })
        .collect()
}
