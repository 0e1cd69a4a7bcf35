//! Cleaning Counters

use crate::CleaningError;
use serde::Serialize;

/// What the normalizer kept, dropped and repaired in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    /// Raw rows received
    pub rows_in: usize,
    /// Observations produced
    pub rows_out: usize,
    pub missing_field: usize,
    pub unparseable_date: usize,
    pub invalid_price: usize,
    pub empty_identifier: usize,
    pub unfillable_price: usize,
    pub duplicates: usize,
    /// Zero prices replaced by an earlier price
    pub forward_filled: usize,
}

impl CleaningReport {
    /// Count a dropped row
    pub fn record(&mut self, err: &CleaningError) {
        match err {
            CleaningError::MissingField(_) => self.missing_field += 1,
            CleaningError::UnparseableDate { .. } => self.unparseable_date += 1,
            CleaningError::InvalidPrice(_) => self.invalid_price += 1,
            CleaningError::EmptyIdentifier(_) => self.empty_identifier += 1,
            CleaningError::Unfillable => self.unfillable_price += 1,
            CleaningError::Duplicate => self.duplicates += 1,
        }
    }

    /// Total rows dropped for any reason
    pub fn dropped(&self) -> usize {
        self.missing_field
            + self.unparseable_date
            + self.invalid_price
            + self.empty_identifier
            + self.unfillable_price
            + self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut report = CleaningReport::default();
        report.record(&CleaningError::MissingField("city_id"));
        report.record(&CleaningError::Duplicate);
        report.record(&CleaningError::Duplicate);

        assert_eq!(report.missing_field, 1);
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.dropped(), 3);
    }
}
