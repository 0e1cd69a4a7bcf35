//! (product, city) Grouping

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Canonical form of a product or city identifier
pub fn canonicalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Key identifying one price series
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub product_id: String,
    pub city_id: String,
}

impl GroupKey {
    /// Build a key, canonicalizing both identifiers
    pub fn new(product_id: &str, city_id: &str) -> Self {
        Self {
            product_id: canonicalize(product_id),
            city_id: canonicalize(city_id),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.city_id)
    }
}

/// Anything that belongs to a (product, city) series
pub trait Grouped {
    fn product_id(&self) -> &str;
    fn city_id(&self) -> &str;

    /// Whether two items belong to the same series
    fn same_group<O: Grouped + ?Sized>(&self, other: &O) -> bool {
        self.product_id() == other.product_id() && self.city_id() == other.city_id()
    }

    /// Owned key for this item's series (identifiers are already canonical)
    fn group_key(&self) -> GroupKey {
        GroupKey {
            product_id: self.product_id().to_string(),
            city_id: self.city_id().to_string(),
        }
    }
}

/// Index ranges of contiguous runs sharing a group.
///
/// Rows must already be sorted by (product, city, date); every range is then
/// exactly one series in temporal order.
pub fn group_ranges<T: Grouped>(rows: &[T]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for i in 1..=rows.len() {
        if i == rows.len() || !rows[i].same_group(&rows[start]) {
            if start < i {
                ranges.push(start..i);
            }
            start = i;
        }
    }

    ranges
}
