//! Month-of-Year Seasonality and Price Drops

use price_series::DerivedRow;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Average price for one month of the year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyProfile {
    /// Month of year (1-12)
    pub month: u32,
    pub monthly_avg: f64,
    /// monthly_avg / series mean x 100
    pub index: f64,
}

/// Mean price per month of year, and the series mean
fn monthly_means(series: &[DerivedRow]) -> (BTreeMap<u32, f64>, f64) {
    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    let mut total = 0.0;

    for row in series {
        let entry = sums.entry(row.month()).or_insert((0.0, 0));
        entry.0 += row.price();
        entry.1 += 1;
        total += row.price();
    }

    let overall = if series.is_empty() {
        0.0
    } else {
        total / series.len() as f64
    };
    let means = sums
        .into_iter()
        .map(|(month, (sum, count))| (month, sum / count as f64))
        .collect();
    (means, overall)
}

fn index(monthly_avg: f64, overall: f64) -> f64 {
    if overall > 0.0 {
        monthly_avg / overall * 100.0
    } else {
        100.0
    }
}

/// Fills prev_price, price_drop, monthly_avg and seasonal_index for one series
#[derive(Debug, Default)]
pub struct SeasonalSummarizer;

impl SeasonalSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize one series in place; returns the number of price drops
    pub fn apply(&self, series: &mut [DerivedRow]) -> usize {
        if series.is_empty() {
            return 0;
        }

        let mut drops = 0;
        let mut prev: Option<f64> = None;
        for row in series.iter_mut() {
            row.prev_price = prev;
            row.price_drop = matches!(prev, Some(p) if row.average_price < p);
            if row.price_drop {
                drops += 1;
            }
            prev = Some(row.average_price);
        }

        let (means, overall) = monthly_means(series);
        for row in series.iter_mut() {
            let monthly_avg = means.get(&row.month()).copied().unwrap_or(row.average_price);
            row.monthly_avg = monthly_avg;
            row.seasonal_index = index(monthly_avg, overall);
        }

        debug!(
            "{}/{}: {} price drops, {} months covered",
            series[0].product_id,
            series[0].city_id,
            drops,
            means.len()
        );
        drops
    }
}

/// Rows whose price fell from the previous observation
pub fn price_drops(rows: &[DerivedRow]) -> Vec<&DerivedRow> {
    rows.iter().filter(|r| r.price_drop).collect()
}

/// Month-of-year averages and indices of one series, by month
pub fn seasonality_profile(series: &[DerivedRow]) -> Vec<MonthlyProfile> {
    let (means, overall) = monthly_means(series);
    means
        .into_iter()
        .map(|(month, monthly_avg)| MonthlyProfile {
            month,
            monthly_avg,
            index: index(monthly_avg, overall),
        })
        .collect()
}
