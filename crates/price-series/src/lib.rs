//! Price Series Data Model
//!
//! Shared types flowing through the analytics pipeline: cleaned observations,
//! the enriched per-row output, (product, city) grouping and model orders.

mod derived;
mod group;
mod observation;
mod order;

pub use derived::{DerivedRow, RsiZone};
pub use group::{canonicalize, group_ranges, GroupKey, Grouped};
pub use observation::Observation;
pub use order::{ArimaOrder, ModelOrder};
