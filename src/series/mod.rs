//! Observations and the immutable series built from them

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::temporal::{date_range, Frequency};

/// A single timestamped value of one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub series_id: String,
    pub timestamp: NaiveDate,
    pub value: f64,
}

/// Regularly sampled, immutable sequence of observations sharing one id
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: String,
    frequency: Frequency,
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series from observations.
    ///
    /// Observations must all carry `id`, hold finite values, and sit on
    /// contiguous steps of `frequency` starting at the first timestamp.
    pub fn new(
        id: impl Into<String>,
        frequency: Frequency,
        observations: Vec<Observation>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "series id must not be empty".to_string(),
            ));
        }
        frequency.validate()?;
        let first = observations
            .first()
            .ok_or_else(|| Error::InvalidParameter(format!("series '{}' is empty", id)))?
            .timestamp;

        for (i, obs) in observations.iter().enumerate() {
            if obs.series_id != id {
                return Err(Error::InvalidParameter(format!(
                    "observation {} belongs to series '{}', expected '{}'",
                    i, obs.series_id, id
                )));
            }
            if !obs.value.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "observation {} of series '{}' is not finite",
                    i, id
                )));
            }
            let expected = frequency.advance(first, i);
            if expected != Some(obs.timestamp) {
                return Err(Error::InvalidParameter(format!(
                    "observation {} of series '{}' at {} is not contiguous at frequency {}",
                    i, id, obs.timestamp, frequency
                )));
            }
        }

        Ok(Series {
            id,
            frequency,
            observations,
        })
    }

    /// Build a series from raw values laid out from `start`
    pub fn from_values(
        id: impl Into<String>,
        start: NaiveDate,
        frequency: Frequency,
        values: Vec<f64>,
    ) -> Result<Self> {
        let id = id.into();
        let timestamps = date_range(start, values.len(), frequency)?;
        let observations = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| Observation {
                series_id: id.clone(),
                timestamp,
                value,
            })
            .collect();
        Series::new(id, frequency, observations)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> NaiveDate {
        self.observations[0].timestamp
    }

    pub fn last_timestamp(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].timestamp
    }

    /// The last `n` values (fewer if the series is shorter)
    pub fn tail_values(&self, n: usize) -> Vec<f64> {
        let start = self.observations.len().saturating_sub(n);
        self.observations[start..].iter().map(|o| o.value).collect()
    }

    /// The `n` timestamps that follow the last observation
    pub fn future_timestamps(&self, n: usize) -> Result<Vec<NaiveDate>> {
        let first = self.first_timestamp();
        let len = self.len();
        (len..len + n)
            .map(|i| {
                self.frequency.advance(first, i).ok_or_else(|| {
                    Error::InvalidParameter(format!(
                        "forecast step {} of series '{}' is out of calendar range",
                        i + 1 - len,
                        self.id
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn test_from_values() {
        let series = Series::from_values("oil", start(), Frequency::Daily, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.id(), "oil");
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last_timestamp(), NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(series.tail_values(2), vec![2.0, 3.0]);
        assert_eq!(series.tail_values(10), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_future_timestamps_continue_the_series() {
        let series = Series::from_values("oil", start(), Frequency::Weekly, vec![1.0, 2.0]).unwrap();
        let future = series.future_timestamps(2).unwrap();
        assert_eq!(
            future,
            vec![
                NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 22).unwrap(),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_and_bad_ids() {
        assert!(Series::from_values("oil", start(), Frequency::Daily, vec![]).is_err());
        assert!(Series::from_values("  ", start(), Frequency::Daily, vec![1.0]).is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let err = Series::from_values("oil", start(), Frequency::Daily, vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_rejects_gaps_duplicates_and_foreign_ids() {
        let obs = |id: &str, day: u32, value: f64| Observation {
            series_id: id.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            value,
        };

        let gap = vec![obs("oil", 1, 1.0), obs("oil", 3, 2.0)];
        assert!(Series::new("oil", Frequency::Daily, gap).is_err());

        let duplicate = vec![obs("oil", 1, 1.0), obs("oil", 1, 2.0)];
        assert!(Series::new("oil", Frequency::Daily, duplicate).is_err());

        let foreign = vec![obs("oil", 1, 1.0), obs("gas", 2, 2.0)];
        assert!(Series::new("oil", Frequency::Daily, foreign).is_err());

        let ok = vec![obs("oil", 1, 1.0), obs("oil", 2, 2.0)];
        assert!(Series::new("oil", Frequency::Daily, ok).is_ok());
    }

    #[test]
    fn test_rejects_zero_day_frequency() {
        let same_day = vec![
            Observation {
                series_id: "oil".to_string(),
                timestamp: start(),
                value: 1.0,
            },
            Observation {
                series_id: "oil".to_string(),
                timestamp: start(),
                value: 2.0,
            },
        ];
        let err = Series::new("oil", Frequency::Custom(0), same_day).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let single = Series::from_values("oil", start(), Frequency::Custom(0), vec![1.0]);
        assert!(single.is_err());
    }
}
