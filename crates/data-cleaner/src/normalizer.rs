//! Raw Row Normalization

use crate::filter::{FillScope, ForwardFill};
use crate::{CleaningError, CleaningReport, RawRecord, Validator};
use chrono::NaiveDate;
use price_series::Observation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Normalizer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Scope of the zero-price forward fill
    pub fill_scope: FillScope,
}

/// Cleaned observations plus what happened to the input
#[derive(Debug, Clone)]
pub struct CleanOutput {
    /// Sorted by (product, city, capture_date)
    pub observations: Vec<Observation>,
    pub report: CleaningReport,
}

/// Row that passed field validation; `price` is `None` when it needs filling
struct PendingRow {
    product_id: String,
    city_id: String,
    capture_date: NaiveDate,
    creation_date: Option<NaiveDate>,
    price: Option<f64>,
}

/// Turns raw rows into the canonical observation set
pub struct Normalizer {
    config: CleanerConfig,
    validator: Validator,
}

impl Normalizer {
    /// Create a new normalizer
    pub fn new(config: CleanerConfig) -> Self {
        Self {
            config,
            validator: Validator::new(),
        }
    }

    /// Clean a batch of raw rows.
    ///
    /// Order of operations: validate and canonicalize each row, stable-sort by
    /// (product, city, capture_date), forward-fill zero prices in that order,
    /// then drop exact duplicates keeping the first. Output of this function
    /// fed back in comes out unchanged.
    pub fn clean<I>(&self, records: I) -> CleanOutput
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut report = CleaningReport::default();
        let mut pending = Vec::new();

        for raw in records {
            report.rows_in += 1;
            match self.validate(&raw) {
                Ok(row) => pending.push(row),
                Err(err) => {
                    debug!("Dropping row {}: {}", report.rows_in, err);
                    report.record(&err);
                }
            }
        }

        pending.sort_by(|a, b| {
            (&a.product_id, &a.city_id, a.capture_date).cmp(&(
                &b.product_id,
                &b.city_id,
                b.capture_date,
            ))
        });

        let mut fill = ForwardFill::new(self.config.fill_scope);
        let mut seen = HashSet::new();
        let mut observations = Vec::with_capacity(pending.len());

        for row in pending {
            let Some(price) = fill.fill(&row.product_id, &row.city_id, row.price) else {
                debug!(
                    "Dropping {}/{} on {}: {}",
                    row.product_id,
                    row.city_id,
                    row.capture_date,
                    CleaningError::Unfillable
                );
                report.record(&CleaningError::Unfillable);
                continue;
            };

            // Whole-row identity; same-day rows with different prices both stay
            let identity = (
                row.product_id.clone(),
                row.city_id.clone(),
                row.capture_date,
                row.creation_date,
                price.to_bits(),
            );
            if !seen.insert(identity) {
                report.record(&CleaningError::Duplicate);
                continue;
            }

            observations.push(Observation {
                product_id: row.product_id,
                city_id: row.city_id,
                capture_date: row.capture_date,
                creation_date: row.creation_date,
                average_price: price,
            });
        }

        report.forward_filled = fill.filled();
        report.rows_out = observations.len();

        info!(
            "Cleaned {} rows into {} observations ({} dropped, {} prices forward-filled, scope {:?})",
            report.rows_in,
            report.rows_out,
            report.dropped(),
            report.forward_filled,
            self.config.fill_scope
        );

        CleanOutput {
            observations,
            report,
        }
    }

    /// Field checks for a single row
    fn validate(&self, raw: &RawRecord) -> Result<PendingRow, CleaningError> {
        let capture_date = self.validator.capture_date(raw.capture_date.as_deref())?;
        let product_id = self
            .validator
            .identifier("product_id", raw.product_id.as_deref())?;
        let city_id = self.validator.identifier("city_id", raw.city_id.as_deref())?;
        let price = self.validator.price(raw.average_price.as_deref())?;
        let creation_date = self.validator.creation_date(raw.creation_date.as_deref());

        Ok(PendingRow {
            product_id,
            city_id,
            capture_date,
            creation_date,
            price,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(CleanerConfig::default())
    }
}
