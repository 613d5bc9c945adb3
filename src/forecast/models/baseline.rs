//! Baseline forecasters

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::forecast::{ForecastPoint, Forecaster, TrainingSpec};
use crate::series::Series;

#[derive(Debug, Clone)]
struct Anchor {
    last_value: f64,
    step: f64,
    timestamps: Vec<NaiveDate>,
}

impl Anchor {
    fn points(&self) -> Vec<ForecastPoint> {
        self.timestamps
            .iter()
            .enumerate()
            .map(|(i, &timestamp)| ForecastPoint {
                timestamp,
                predicted_value: self.last_value + self.step * (i + 1) as f64,
            })
            .collect()
    }
}

/// Repeats the last observed value over the horizon
#[derive(Debug, Clone, Default)]
pub struct NaiveForecaster {
    anchor: Option<Anchor>,
}

impl NaiveForecaster {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for NaiveForecaster {
    fn name(&self) -> &str {
        "Naive"
    }

    fn fit(&mut self, series: &Series, spec: &TrainingSpec) -> Result<()> {
        let last_value = series.tail_values(1)[0];
        self.anchor = Some(Anchor {
            last_value,
            step: 0.0,
            timestamps: series.future_timestamps(spec.horizon)?,
        });
        Ok(())
    }

    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        self.anchor
            .as_ref()
            .map(Anchor::points)
            .ok_or_else(|| Error::model_failure(self.name(), "model not fitted"))
    }
}

/// Extends the last value by the average step over the lookback window
#[derive(Debug, Clone, Default)]
pub struct DriftForecaster {
    anchor: Option<Anchor>,
}

impl DriftForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average step, once fitted
    pub fn drift(&self) -> Option<f64> {
        self.anchor.as_ref().map(|a| a.step)
    }
}

impl Forecaster for DriftForecaster {
    fn name(&self) -> &str {
        "Drift"
    }

    fn fit(&mut self, series: &Series, spec: &TrainingSpec) -> Result<()> {
        let window = series.tail_values(spec.lookback_window.max(1));
        let last_value = window[window.len() - 1];
        let step = if window.len() > 1 {
            (last_value - window[0]) / (window.len() - 1) as f64
        } else {
            0.0
        };
        self.anchor = Some(Anchor {
            last_value,
            step,
            timestamps: series.future_timestamps(spec.horizon)?,
        });
        Ok(())
    }

    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        self.anchor
            .as_ref()
            .map(Anchor::points)
            .ok_or_else(|| Error::model_failure(self.name(), "model not fitted"))
    }
}
