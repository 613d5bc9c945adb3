//! CSV output

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;

use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::series::Series;

#[derive(Serialize)]
struct ForecastRow<'a> {
    series_id: &'a str,
    timestamp: NaiveDate,
    predicted_value: f64,
}

/// Write the forecast as `series_id,timestamp,predicted_value`
pub fn write_forecast_csv<P: AsRef<Path>>(result: &ForecastResult, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    for point in result.points() {
        wtr.serialize(ForecastRow {
            series_id: result.series_id(),
            timestamp: point.timestamp,
            predicted_value: point.predicted_value,
        })?;
    }

    wtr.flush()?;
    log::info!(
        "wrote {} forecast rows to {}",
        result.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Write the observations as `series_id,timestamp,value`
pub fn write_series_csv<P: AsRef<Path>>(series: &Series, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    for obs in series.observations() {
        wtr.serialize(obs)?;
    }

    wtr.flush()?;
    log::debug!("wrote {} observations to {}", series.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastPoint;
    use crate::temporal::Frequency;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_forecast_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forecast.csv");
        let result = ForecastResult::new(
            "oil",
            "Naive",
            vec![
                ForecastPoint {
                    timestamp: NaiveDate::from_ymd_opt(2023, 4, 11).unwrap(),
                    predicted_value: 81.25,
                },
                ForecastPoint {
                    timestamp: NaiveDate::from_ymd_opt(2023, 4, 12).unwrap(),
                    predicted_value: 81.5,
                },
            ],
        );

        write_forecast_csv(&result, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "series_id,timestamp,predicted_value");
        assert_eq!(lines[1], "oil,2023-04-11,81.25");
        assert_eq!(lines[2], "oil,2023-04-12,81.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_series_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let series = Series::from_values("oil", start, Frequency::Daily, vec![80.0, 80.5]).unwrap();

        write_series_csv(&series, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec!["series_id,timestamp,value", "oil,2023-01-01,80.0", "oil,2023-01-02,80.5"]
        );
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("forecast.csv");
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let series = Series::from_values("oil", start, Frequency::Daily, vec![1.0]).unwrap();
        let err = write_series_csv(&series, &path).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
