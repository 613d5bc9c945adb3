//! Calendar helpers for regularly sampled series

mod frequency;

use chrono::NaiveDate;

use crate::error::{Error, Result};

pub use self::frequency::Frequency;

/// Build `periods` contiguous timestamps starting at `start`
pub fn date_range(start: NaiveDate, periods: usize, frequency: Frequency) -> Result<Vec<NaiveDate>> {
    frequency.validate()?;
    (0..periods)
        .map(|i| {
            frequency.advance(start, i).ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "timestamp {} steps after {} at frequency {} is out of range",
                    i, start, frequency
                ))
            })
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidParameter(format!("invalid date '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_daily() {
        let start = parse_date("2023-01-01").unwrap();
        let range = date_range(start, 10, Frequency::Daily).unwrap();
        assert_eq!(range.len(), 10);
        assert_eq!(range[0], start);
        assert_eq!(range[9], parse_date("2023-01-10").unwrap());
    }

    #[test]
    fn test_date_range_empty() {
        let start = parse_date("2023-01-01").unwrap();
        assert!(date_range(start, 0, Frequency::Daily).unwrap().is_empty());
    }

    #[test]
    fn test_date_range_rejects_zero_step() {
        let start = parse_date("2023-01-01").unwrap();
        let err = date_range(start, 3, Frequency::Custom(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_date_range_out_of_range() {
        let err = date_range(NaiveDate::MAX, 2, Frequency::Daily).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("01/02/2023").is_err());
        assert_eq!(
            parse_date(" 2023-04-11 ").unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 11).unwrap()
        );
    }
}
