//! Repository Implementation

use price_series::{group_ranges, DerivedRow, GroupKey, Grouped};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use tracing::info;

/// Read-only queries over one run's enriched rows
pub struct Repository {
    rows: Vec<DerivedRow>,
    /// Series key -> index range in `rows`
    index: BTreeMap<GroupKey, Range<usize>>,
}

impl Repository {
    /// Index rows already sorted by (product, city, date)
    pub fn new(rows: Vec<DerivedRow>) -> Self {
        let index: BTreeMap<GroupKey, Range<usize>> = group_ranges(&rows)
            .into_iter()
            .map(|range| (rows[range.start].group_key(), range))
            .collect();
        info!("Repository holds {} rows in {} series", rows.len(), index.len());
        Self { rows, index }
    }

    /// Most recent row of every series, ordered by key
    pub fn latest_by_group(&self) -> Vec<&DerivedRow> {
        self.index
            .values()
            .filter_map(|range| self.rows[range.clone()].last())
            .collect()
    }

    /// Full ordered history of one series; empty when unknown
    pub fn history(&self, product_id: &str, city_id: &str) -> &[DerivedRow] {
        let key = GroupKey::new(product_id, city_id);
        match self.index.get(&key) {
            Some(range) => &self.rows[range.clone()],
            None => &[],
        }
    }

    /// All series keys
    pub fn groups(&self) -> Vec<&GroupKey> {
        self.index.keys().collect()
    }

    /// Distinct products, sorted
    pub fn products(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.index.keys().map(|k| k.product_id.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct cities, sorted
    pub fn cities(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.index.keys().map(|k| k.city_id.as_str()).collect();
        set.into_iter().collect()
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<DerivedRow> {
        self.rows
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
