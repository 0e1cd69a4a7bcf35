//! Field Validation for Raw Rows

use crate::CleaningError;
use chrono::{NaiveDate, NaiveDateTime};
use price_series::canonicalize;

/// Date-only layouts, day-first before ISO
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Layouts carrying a time of day, which is discarded
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a day-first (or ISO) date, ignoring any time of day
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Per-field checks applied to every raw row
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Canonical identifier; missing or blank values are rejected
    pub fn identifier(
        &self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Result<String, CleaningError> {
        let raw = raw.ok_or(CleaningError::MissingField(field))?;
        let id = canonicalize(raw);
        if id.is_empty() {
            return Err(CleaningError::EmptyIdentifier(field));
        }
        Ok(id)
    }

    /// Capture date is required
    pub fn capture_date(&self, raw: Option<&str>) -> Result<NaiveDate, CleaningError> {
        let raw = raw.ok_or(CleaningError::MissingField("capture_date"))?;
        parse_date(raw).ok_or_else(|| CleaningError::UnparseableDate {
            field: "capture_date",
            value: raw.to_string(),
        })
    }

    /// Creation date is informational; anything unparseable becomes `None`
    pub fn creation_date(&self, raw: Option<&str>) -> Option<NaiveDate> {
        raw.and_then(parse_date)
    }

    /// Price check.
    ///
    /// `Ok(None)` means the price is zero, which counts as missing and is left
    /// for the forward-fill pass.
    pub fn price(&self, raw: Option<&str>) -> Result<Option<f64>, CleaningError> {
        let raw = raw.ok_or(CleaningError::MissingField("average_price"))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CleaningError::MissingField("average_price"));
        }

        let value: f64 = trimmed
            .parse()
            .map_err(|_| CleaningError::InvalidPrice(raw.to_string()))?;

        if !value.is_finite() || value < 0.0 {
            return Err(CleaningError::InvalidPrice(raw.to_string()));
        }
        if value == 0.0 {
            return Ok(None);
        }
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_dates() {
        assert_eq!(parse_date("05/01/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05-01-2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(" 31.12.2023 "), Some(ymd(2023, 12, 31)));
        assert_eq!(parse_date("05/01/2024 13:45:00"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T08:00:00"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("32/01/2024"), None);
        // Day-first: month 13 does not exist
        assert_eq!(parse_date("01/13/2024"), None);
    }

    #[test]
    fn test_identifier_canonical() {
        let v = Validator::new();
        assert_eq!(v.identifier("product_id", Some("  Leche ")).unwrap(), "leche");
        assert_eq!(
            v.identifier("city_id", Some("   ")),
            Err(CleaningError::EmptyIdentifier("city_id"))
        );
        assert_eq!(
            v.identifier("city_id", None),
            Err(CleaningError::MissingField("city_id"))
        );
    }

    #[test]
    fn test_price_rules() {
        let v = Validator::new();
        assert_eq!(v.price(Some("12.5")), Ok(Some(12.5)));
        assert_eq!(v.price(Some("0")), Ok(None));
        assert_eq!(v.price(Some("0.0")), Ok(None));
        assert!(matches!(v.price(Some("-3")), Err(CleaningError::InvalidPrice(_))));
        assert!(matches!(v.price(Some("abc")), Err(CleaningError::InvalidPrice(_))));
        assert!(matches!(v.price(Some("NaN")), Err(CleaningError::InvalidPrice(_))));
        assert_eq!(v.price(None), Err(CleaningError::MissingField("average_price")));
        assert_eq!(v.price(Some(" ")), Err(CleaningError::MissingField("average_price")));
    }

    #[test]
    fn test_creation_date_is_lenient() {
        let v = Validator::new();
        assert_eq!(v.creation_date(Some("garbage")), None);
        assert_eq!(v.creation_date(Some("02/02/2024")), Some(ymd(2024, 2, 2)));
        assert_eq!(v.creation_date(None), None);
    }
}
