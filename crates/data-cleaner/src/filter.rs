//! Zero-Price Forward Fill

use price_series::GroupKey;
use serde::{Deserialize, Serialize};

/// How far back a missing price may borrow a value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillScope {
    /// Carry the last price across the whole sorted dataset, even from a
    /// different (product, city) series
    #[default]
    Dataset,
    /// Only carry prices within the same (product, city) series
    Group,
}

/// Sequential forward-fill over rows in sorted order
pub struct ForwardFill {
    scope: FillScope,
    /// Last non-missing price seen
    last: Option<f64>,
    /// Series of the previous row (tracked for group scope)
    current: Option<GroupKey>,
    /// Number of prices filled so far
    filled: usize,
}

impl ForwardFill {
    /// Create a new forward-fill pass
    pub fn new(scope: FillScope) -> Self {
        Self {
            scope,
            last: None,
            current: None,
            filled: 0,
        }
    }

    /// Feed the next row's price.
    ///
    /// Returns the price to use, or `None` when the row is missing a price and
    /// nothing is available to carry forward.
    pub fn fill(&mut self, product_id: &str, city_id: &str, price: Option<f64>) -> Option<f64> {
        if self.scope == FillScope::Group {
            let same = self
                .current
                .as_ref()
                .map(|k| k.product_id == product_id && k.city_id == city_id)
                .unwrap_or(false);
            if !same {
                self.last = None;
                self.current = Some(GroupKey {
                    product_id: product_id.to_string(),
                    city_id: city_id.to_string(),
                });
            }
        }

        match price {
            Some(p) => {
                self.last = Some(p);
                Some(p)
            }
            None => {
                if self.last.is_some() {
                    self.filled += 1;
                }
                self.last
            }
        }
    }

    /// Prices filled so far
    pub fn filled(&self) -> usize {
        self.filled
    }
}
