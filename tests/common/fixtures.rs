//! Series, requests and models reused across tests

use chrono::NaiveDate;
use seriescast::forecast::{ForecastPoint, ForecastRequest, Forecaster, TrainingSpec};
use seriescast::{Frequency, GeneratorParams, Result, Series};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 100 daily points from 2023-01-01 around 80.0, seed 42
pub fn reference_params() -> GeneratorParams {
    GeneratorParams::new()
        .series_id("oil")
        .seed(42)
        .start_date(date(2023, 1, 1))
        .length(100)
        .frequency(Frequency::Daily)
        .base_value(80.0)
        .noise_std(0.5)
}

pub fn reference_series() -> Series {
    seriescast::generator::generate(reference_params()).unwrap()
}

/// Horizon 7, lookback 14, budget 300
pub fn reference_request() -> ForecastRequest {
    ForecastRequest::new(7, 14, 300).unwrap()
}

/// `start + slope * i` for `len` daily points from 2023-01-01
pub fn linear_series(len: usize, start: f64, slope: f64) -> Series {
    let values = (0..len).map(|i| start + slope * i as f64).collect();
    Series::from_values("trend", date(2023, 1, 1), Frequency::Daily, values).unwrap()
}

/// Predicts a fixed value at the right timestamps
#[derive(Debug)]
pub struct CannedForecaster {
    pub value: f64,
    timestamps: Vec<NaiveDate>,
}

impl CannedForecaster {
    pub fn new(value: f64) -> Self {
        CannedForecaster {
            value,
            timestamps: Vec::new(),
        }
    }
}

impl Forecaster for CannedForecaster {
    fn name(&self) -> &str {
        "Canned"
    }

    fn fit(&mut self, series: &Series, spec: &TrainingSpec) -> Result<()> {
        self.timestamps = series.future_timestamps(spec.horizon)?;
        Ok(())
    }

    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        Ok(self
            .timestamps
            .iter()
            .map(|&timestamp| ForecastPoint {
                timestamp,
                predicted_value: self.value,
            })
            .collect())
    }
}
