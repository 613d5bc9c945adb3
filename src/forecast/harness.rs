//! Fit → predict → render sequence for one series and one model

use log::{debug, info};
use std::fmt;

use crate::error::{Error, Result};
use crate::forecast::{ForecastRequest, ForecastResult, Forecaster};
use crate::series::Series;
use crate::vis::Renderer;

/// Lifecycle of a harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Unfitted,
    Fitting,
    Fitted,
    Predicted,
}

impl HarnessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarnessState::Unfitted => "unfitted",
            HarnessState::Fitting => "fitting",
            HarnessState::Fitted => "fitted",
            HarnessState::Predicted => "predicted",
        }
    }
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trained model together with the data and request it was trained on
#[derive(Debug)]
pub struct FittedModel<M> {
    model: M,
    series: Series,
    request: ForecastRequest,
}

impl<M: Forecaster> FittedModel<M> {
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn request(&self) -> &ForecastRequest {
        &self.request
    }

    /// Ask the model for its forecast and check it continues the series
    fn forecast(&self) -> Result<ForecastResult> {
        let name = self.model.name().to_string();
        let horizon = self.request.horizon();
        let points = self.model.predict()?;

        if points.len() != horizon {
            return Err(Error::model_failure(
                name,
                format!("returned {} points for a horizon of {}", points.len(), horizon),
            ));
        }
        let expected = self.series.future_timestamps(horizon)?;
        for (i, (point, ts)) in points.iter().zip(&expected).enumerate() {
            if point.timestamp != *ts {
                return Err(Error::model_failure(
                    name,
                    format!("point {} is at {}, expected {}", i, point.timestamp, ts),
                ));
            }
            if !point.predicted_value.is_finite() {
                return Err(Error::model_failure(
                    name,
                    format!("point {} at {} is not finite", i, point.timestamp),
                ));
            }
        }

        Ok(ForecastResult::new(self.series.id(), name, points))
    }
}

enum Stage<M> {
    Unfitted(M),
    Fitting,
    Fitted(FittedModel<M>),
    Predicted(FittedModel<M>, ForecastResult),
}

impl<M> Stage<M> {
    fn state(&self) -> HarnessState {
        match self {
            Stage::Unfitted(_) => HarnessState::Unfitted,
            Stage::Fitting => HarnessState::Fitting,
            Stage::Fitted(_) => HarnessState::Fitted,
            Stage::Predicted(..) => HarnessState::Predicted,
        }
    }
}

/// Drives one model through `Unfitted → Fitting → Fitted → Predicted`.
///
/// `fit` is accepted once; a harness whose fit failed inside the model stays
/// in `Fitting` and must be replaced. `predict` caches its result, so repeat
/// calls return the same forecast.
pub struct ForecastHarness<M: Forecaster> {
    stage: Stage<M>,
}

impl<M: Forecaster> ForecastHarness<M> {
    pub fn new(model: M) -> Self {
        ForecastHarness {
            stage: Stage::Unfitted(model),
        }
    }

    pub fn state(&self) -> HarnessState {
        self.stage.state()
    }

    /// The fitted model, once fitting has succeeded
    pub fn fitted(&self) -> Option<&FittedModel<M>> {
        match &self.stage {
            Stage::Fitted(fitted) | Stage::Predicted(fitted, _) => Some(fitted),
            _ => None,
        }
    }

    pub fn series(&self) -> Option<&Series> {
        self.fitted().map(|f| &f.series)
    }

    /// The cached forecast, once predicted
    pub fn result(&self) -> Option<&ForecastResult> {
        match &self.stage {
            Stage::Predicted(_, result) => Some(result),
            _ => None,
        }
    }

    /// Train the model on `series`.
    ///
    /// A request the series cannot satisfy is rejected before the model is
    /// touched and leaves the harness unfitted.
    pub fn fit(&mut self, series: Series, request: ForecastRequest) -> Result<&FittedModel<M>> {
        let mut model = match std::mem::replace(&mut self.stage, Stage::Fitting) {
            Stage::Unfitted(model) => model,
            other => {
                let state = other.state();
                self.stage = other;
                return Err(Error::InvalidState {
                    operation: "fit",
                    state: state.as_str(),
                });
            }
        };

        if let Err(e) = request.validate_against(&series) {
            self.stage = Stage::Unfitted(model);
            return Err(e);
        }

        debug!(
            "fitting {} on '{}' ({} observations): horizon={} lookback={} budget={}",
            model.name(),
            series.id(),
            series.len(),
            request.horizon(),
            request.lookback_window(),
            request.training_budget()
        );
        model.fit(&series, &request.training_spec())?;
        info!("{} fitted on '{}'", model.name(), series.id());

        self.stage = Stage::Fitted(FittedModel {
            model,
            series,
            request,
        });
        self.fitted().ok_or(Error::InvalidState {
            operation: "fit",
            state: HarnessState::Fitting.as_str(),
        })
    }

    /// Forecast the fitted horizon
    pub fn predict(&mut self) -> Result<ForecastResult> {
        let result = match &self.stage {
            Stage::Predicted(_, result) => return Ok(result.clone()),
            Stage::Fitted(fitted) => fitted.forecast()?,
            other => {
                return Err(Error::InvalidState {
                    operation: "predict",
                    state: other.state().as_str(),
                })
            }
        };
        info!(
            "{} forecast {} points for '{}'",
            result.model(),
            result.len(),
            result.series_id()
        );

        if let Stage::Fitted(fitted) = std::mem::replace(&mut self.stage, Stage::Fitting) {
            self.stage = Stage::Predicted(fitted, result.clone());
        }
        Ok(result)
    }

    /// Hand the series and forecast to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        match &self.stage {
            Stage::Predicted(fitted, result) => renderer.render(&fitted.series, result),
            other => Err(Error::InvalidState {
                operation: "render",
                state: other.state().as_str(),
            }),
        }
    }
}
