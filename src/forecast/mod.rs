//! Forecasting: request and result types, the model capability, and the
//! harness that drives one model through fit and predict.
//!
//! # Models
//!
//! - [`models::MlpForecaster`] - windowed multi-layer perceptron, direct multi-horizon output
//! - [`models::NaiveForecaster`] - repeats the last observation
//! - [`models::DriftForecaster`] - extrapolates the average step of the lookback window

pub mod harness;
pub mod models;

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};
use crate::series::Series;

pub use harness::{FittedModel, ForecastHarness, HarnessState};
pub use models::{
    Activation, DriftForecaster, MlpConfig, MlpConfigBuilder, MlpForecaster, ModelKind,
    NaiveForecaster,
};

/// What to forecast and how much effort the model may spend fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRequest {
    horizon: usize,
    lookback_window: usize,
    training_budget: usize,
}

impl ForecastRequest {
    pub fn new(horizon: usize, lookback_window: usize, training_budget: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(Error::InvalidParameter(
                "horizon must be greater than zero".to_string(),
            ));
        }
        if lookback_window == 0 {
            return Err(Error::InvalidParameter(
                "lookback_window must be greater than zero".to_string(),
            ));
        }
        if training_budget == 0 {
            return Err(Error::InvalidParameter(
                "training_budget must be greater than zero".to_string(),
            ));
        }
        Ok(ForecastRequest {
            horizon,
            lookback_window,
            training_budget,
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn lookback_window(&self) -> usize {
        self.lookback_window
    }

    pub fn training_budget(&self) -> usize {
        self.training_budget
    }

    /// Observations needed to build at least one training window
    pub fn required_length(&self) -> Result<usize> {
        self.lookback_window
            .checked_add(self.horizon)
            .ok_or_else(|| Error::InvalidParameter("lookback_window + horizon overflows".to_string()))
    }

    /// Check the series is long enough for this request
    pub fn validate_against(&self, series: &Series) -> Result<()> {
        let required = self.required_length()?;
        if series.len() < required {
            return Err(Error::InsufficientData {
                required,
                available: series.len(),
            });
        }
        series.future_timestamps(self.horizon)?;
        Ok(())
    }

    pub fn training_spec(&self) -> TrainingSpec {
        TrainingSpec {
            horizon: self.horizon,
            lookback_window: self.lookback_window,
            budget: self.training_budget,
        }
    }
}

/// Settings handed to a model's `fit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingSpec {
    /// Number of future steps the model must produce
    pub horizon: usize,
    /// Number of past steps the model consumes
    pub lookback_window: usize,
    /// Optimization budget; its unit is up to the model
    pub budget: usize,
}

/// One forecasted value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDate,
    pub predicted_value: f64,
}

/// Forecast for one series produced by one model
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    series_id: String,
    model: String,
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn new(series_id: impl Into<String>, model: impl Into<String>, points: Vec<ForecastPoint>) -> Self {
        ForecastResult {
            series_id: series_id.into(),
            model: model.into(),
            points,
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted_value).collect()
    }
}

impl fmt::Display for ForecastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id_width = self.series_id.len().max("series_id".len());
        writeln!(
            f,
            "{:<id_width$}  {:<10}  {:>15}",
            "series_id",
            "timestamp",
            "predicted_value",
            id_width = id_width
        )?;
        for point in &self.points {
            writeln!(
                f,
                "{:<id_width$}  {:<10}  {:>15.4}",
                self.series_id,
                point.timestamp.format("%Y-%m-%d").to_string(),
                point.predicted_value,
                id_width = id_width
            )?;
        }
        Ok(())
    }
}

/// Capability every forecasting model provides.
///
/// `fit` trains on a series under a [`TrainingSpec`]; `predict` returns the
/// `horizon` points that follow the training data. How the model learns and
/// how it spends the budget is its own business.
pub trait Forecaster {
    /// Model name, used in results and chart titles
    fn name(&self) -> &str;

    /// Train the model
    fn fit(&mut self, series: &Series, spec: &TrainingSpec) -> Result<()>;

    /// Produce the forecast for the fitted horizon
    fn predict(&self) -> Result<Vec<ForecastPoint>>;
}

impl<F: Forecaster + ?Sized> Forecaster for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fit(&mut self, series: &Series, spec: &TrainingSpec) -> Result<()> {
        (**self).fit(series, spec)
    }

    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        (**self).predict()
    }
}
