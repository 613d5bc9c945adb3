//! Neural window forecaster
//!
//! A multi-layer perceptron maps the last `lookback_window` observations to
//! all `horizon` future values at once. Every window of the training series
//! becomes one sample; inputs and targets are taken relative to the last
//! input value and divided by the spread of one-step changes, so the network
//! learns the shape of the path rather than its level.
//!
//! The training budget is the number of optimization steps. Each step draws a
//! mini-batch of windows from a seeded generator and applies stochastic
//! gradient descent on the mean squared error.

use chrono::NaiveDate;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::forecast::{ForecastPoint, Forecaster, TrainingSpec};
use crate::series::Series;

/// Activation function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    /// ReLU (Rectified Linear Unit): max(0, x)
    ReLU,
    /// Sigmoid: 1 / (1 + exp(-x))
    Sigmoid,
    /// Tanh
    Tanh,
    /// Linear/Identity: x
    Linear,
}

impl Activation {
    fn forward(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Activation::ReLU => x.iter().map(|&v| v.max(0.0)).collect(),
            Activation::Sigmoid => x.iter().map(|&v| 1.0 / (1.0 + (-v).exp())).collect(),
            Activation::Tanh => x.iter().map(|&v| v.tanh()).collect(),
            Activation::Linear => x.to_vec(),
        }
    }

    fn backward(&self, x: &[f64], output: &[f64]) -> Vec<f64> {
        match self {
            Activation::ReLU => x.iter().map(|&v| if v > 0.0 { 1.0 } else { 0.0 }).collect(),
            Activation::Sigmoid => output.iter().map(|&o| o * (1.0 - o)).collect(),
            Activation::Tanh => output.iter().map(|&o| 1.0 - o * o).collect(),
            Activation::Linear => vec![1.0; x.len()],
        }
    }
}

fn mse(predicted: &[f64], actual: &[f64]) -> f64 {
    let n = predicted.len() as f64;
    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / n
}

fn mse_gradient(predicted: &[f64], actual: &[f64]) -> Vec<f64> {
    let n = predicted.len() as f64;
    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| 2.0 * (p - a) / n)
        .collect()
}

/// Fully connected layer
#[derive(Debug, Clone)]
struct Layer {
    /// Weight matrix (output_dim x input_dim)
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
    activation: Activation,
    input_cache: Vec<f64>,
    pre_activation_cache: Vec<f64>,
    output_cache: Vec<f64>,
}

impl Layer {
    /// Xavier/Glorot uniform initialization
    fn new(input_dim: usize, output_dim: usize, activation: Activation, rng: &mut StdRng) -> Self {
        let scale = (6.0 / (input_dim + output_dim) as f64).sqrt();
        let weights = (0..output_dim)
            .map(|_| {
                (0..input_dim)
                    .map(|_| rng.random_range(-scale..scale))
                    .collect()
            })
            .collect();

        Layer {
            weights,
            biases: vec![0.0; output_dim],
            activation,
            input_cache: Vec::new(),
            pre_activation_cache: Vec::new(),
            output_cache: Vec::new(),
        }
    }

    fn linear(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| w.iter().zip(input).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect()
    }

    /// Forward pass without touching the caches
    fn infer(&self, input: &[f64]) -> Vec<f64> {
        self.activation.forward(&self.linear(input))
    }

    /// Forward pass keeping what backprop needs
    fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        self.input_cache = input.to_vec();
        self.pre_activation_cache = self.linear(input);
        self.output_cache = self.activation.forward(&self.pre_activation_cache);
        self.output_cache.clone()
    }

    fn backward(&mut self, grad_output: &[f64], learning_rate: f64) -> Vec<f64> {
        let activation_grad = self
            .activation
            .backward(&self.pre_activation_cache, &self.output_cache);
        let delta: Vec<f64> = grad_output
            .iter()
            .zip(&activation_grad)
            .map(|(g, a)| g * a)
            .collect();

        // Gradient for the input uses the weights before this update
        let grad_input: Vec<f64> = (0..self.input_cache.len())
            .map(|j| {
                self.weights
                    .iter()
                    .zip(&delta)
                    .map(|(w_row, d)| w_row[j] * d)
                    .sum()
            })
            .collect();

        for (i, w_row) in self.weights.iter_mut().enumerate() {
            for (j, w) in w_row.iter_mut().enumerate() {
                *w -= learning_rate * delta[i] * self.input_cache[j];
            }
        }
        for (i, b) in self.biases.iter_mut().enumerate() {
            *b -= learning_rate * delta[i];
        }

        grad_input
    }
}

/// MLP forecaster configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MlpConfig {
    /// Hidden layer sizes
    pub hidden_layers: Vec<usize>,
    /// Activation function for hidden layers
    pub hidden_activation: Activation,
    /// Learning rate
    pub learning_rate: f64,
    /// Windows per optimization step
    pub batch_size: usize,
    /// Seed for weight initialization and batch sampling
    pub random_seed: u64,
    /// Stop after this many steps without a lower batch loss
    pub early_stopping_patience: Option<usize>,
}

impl Default for MlpConfig {
    fn default() -> Self {
        MlpConfig {
            hidden_layers: vec![64, 64],
            hidden_activation: Activation::ReLU,
            learning_rate: 0.001,
            batch_size: 32,
            random_seed: 42,
            early_stopping_patience: None,
        }
    }
}

/// MLP configuration builder
#[derive(Debug, Clone, Default)]
pub struct MlpConfigBuilder {
    config: MlpConfig,
}

impl MlpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden_layers(mut self, layers: Vec<usize>) -> Self {
        self.config.hidden_layers = layers;
        self
    }

    pub fn hidden_activation(mut self, activation: Activation) -> Self {
        self.config.hidden_activation = activation;
        self
    }

    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.config.learning_rate = lr;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    pub fn early_stopping_patience(mut self, patience: Option<usize>) -> Self {
        self.config.early_stopping_patience = patience;
        self
    }

    pub fn build(self) -> MlpConfig {
        self.config
    }
}

/// State kept from fitting for the forecast
#[derive(Debug, Clone)]
struct FitState {
    /// Normalized last window of the training series
    input: Vec<f64>,
    anchor: f64,
    scale: f64,
    timestamps: Vec<NaiveDate>,
}

/// Windowed multi-layer perceptron forecaster
#[derive(Debug, Clone)]
pub struct MlpForecaster {
    config: MlpConfig,
    layers: Vec<Layer>,
    training_loss_history: Vec<f64>,
    state: Option<FitState>,
}

impl MlpForecaster {
    const NAME: &'static str = "MLP";

    pub fn new(config: MlpConfig) -> Self {
        MlpForecaster {
            config,
            layers: Vec::new(),
            training_loss_history: Vec::new(),
            state: None,
        }
    }

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Mean batch loss of every optimization step that ran
    pub fn training_loss_history(&self) -> &[f64] {
        &self.training_loss_history
    }

    fn validate_config(&self) -> Result<()> {
        let c = &self.config;
        if !(c.learning_rate.is_finite() && c.learning_rate > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                c.learning_rate
            )));
        }
        if c.batch_size == 0 {
            return Err(Error::InvalidParameter(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if c.hidden_layers.iter().any(|&size| size == 0) {
            return Err(Error::InvalidParameter(
                "hidden layer sizes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn init_layers(&mut self, input_dim: usize, output_dim: usize, rng: &mut StdRng) {
        self.layers.clear();
        let mut prev_dim = input_dim;
        for &hidden_size in &self.config.hidden_layers {
            self.layers.push(Layer::new(
                prev_dim,
                hidden_size,
                self.config.hidden_activation,
                rng,
            ));
            prev_dim = hidden_size;
        }
        self.layers
            .push(Layer::new(prev_dim, output_dim, Activation::Linear, rng));
    }

    fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        current
    }

    fn backward(&mut self, loss_grad: &[f64]) {
        let mut grad = loss_grad.to_vec();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad, self.config.learning_rate);
        }
    }

    fn infer(&self, input: &[f64]) -> Vec<f64> {
        self.layers
            .iter()
            .fold(input.to_vec(), |current, layer| layer.infer(&current))
    }
}

impl Default for MlpForecaster {
    fn default() -> Self {
        Self::new(MlpConfig::default())
    }
}

/// Spread of one-step changes, used to put windows on a common scale
fn step_scale(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 1.0;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let var = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64;
    let std = var.sqrt();
    if std.is_finite() && std > 1e-12 {
        std
    } else {
        1.0
    }
}

fn normalize(values: &[f64], anchor: f64, scale: f64) -> Vec<f64> {
    values.iter().map(|v| (v - anchor) / scale).collect()
}

impl Forecaster for MlpForecaster {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(&mut self, series: &Series, spec: &TrainingSpec) -> Result<()> {
        self.validate_config()?;
        let values = series.values();
        let lookback = spec.lookback_window;
        let horizon = spec.horizon;
        if lookback == 0 || horizon == 0 || values.len() < lookback + horizon {
            return Err(Error::model_failure(
                Self::NAME,
                format!(
                    "no training window of {} + {} in {} observations",
                    lookback,
                    horizon,
                    values.len()
                ),
            ));
        }

        let scale = step_scale(&values);
        let samples: Vec<(Vec<f64>, Vec<f64>)> = (0..=values.len() - lookback - horizon)
            .map(|start| {
                let anchor = values[start + lookback - 1];
                let x = normalize(&values[start..start + lookback], anchor, scale);
                let y = normalize(
                    &values[start + lookback..start + lookback + horizon],
                    anchor,
                    scale,
                );
                (x, y)
            })
            .collect();
        debug!(
            "{}: {} training windows, scale {:.6}, {} steps",
            Self::NAME,
            samples.len(),
            scale,
            spec.budget
        );

        let mut rng = StdRng::seed_from_u64(self.config.random_seed);
        self.init_layers(lookback, horizon, &mut rng);
        self.training_loss_history.clear();

        let batch_size = self.config.batch_size;
        let mut best_loss = f64::INFINITY;
        let mut patience_counter = 0;

        for step in 0..spec.budget {
            let mut step_loss = 0.0;
            for _ in 0..batch_size {
                let (x, y) = &samples[rng.random_range(0..samples.len())];
                let predicted = self.forward(x);
                step_loss += mse(&predicted, y);
                let grad = mse_gradient(&predicted, y);
                self.backward(&grad);
            }
            step_loss /= batch_size as f64;

            if !step_loss.is_finite() {
                return Err(Error::model_failure(
                    Self::NAME,
                    format!("training diverged at step {}", step),
                ));
            }
            self.training_loss_history.push(step_loss);

            if let Some(patience) = self.config.early_stopping_patience {
                if step_loss < best_loss {
                    best_loss = step_loss;
                    patience_counter = 0;
                } else {
                    patience_counter += 1;
                    if patience_counter >= patience {
                        warn!("{}: early stopping at step {}", Self::NAME, step);
                        break;
                    }
                }
            }

            if step % 100 == 0 {
                debug!("{}: step {} loss = {:.6}", Self::NAME, step, step_loss);
            }
        }

        let anchor = values[values.len() - 1];
        self.state = Some(FitState {
            input: normalize(&values[values.len() - lookback..], anchor, scale),
            anchor,
            scale,
            timestamps: series.future_timestamps(horizon)?,
        });
        info!(
            "{}: trained {} steps, final loss {:.6}",
            Self::NAME,
            self.training_loss_history.len(),
            self.training_loss_history.last().copied().unwrap_or(f64::NAN)
        );
        Ok(())
    }

    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| Error::model_failure(Self::NAME, "model not fitted"))?;

        let output = self.infer(&state.input);
        Ok(state
            .timestamps
            .iter()
            .zip(output)
            .map(|(&timestamp, y)| ForecastPoint {
                timestamp,
                predicted_value: state.anchor + y * state.scale,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::Frequency;

    fn trend_series(len: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Series::from_values("trend", start, Frequency::Daily, (0..len).map(|i| i as f64).collect())
            .unwrap()
    }

    fn spec(budget: usize) -> TrainingSpec {
        TrainingSpec {
            horizon: 7,
            lookback_window: 14,
            budget,
        }
    }

    #[test]
    fn test_activation_forward() {
        assert_eq!(Activation::ReLU.forward(&[-1.0, 2.0]), vec![0.0, 2.0]);
        assert_eq!(Activation::Linear.forward(&[-1.0, 2.0]), vec![-1.0, 2.0]);
        let s = Activation::Sigmoid.forward(&[0.0]);
        assert!((s[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_step_scale() {
        assert_eq!(step_scale(&[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(step_scale(&[5.0]), 1.0);
        let s = step_scale(&[0.0, 1.0, 0.0, 1.0]);
        assert!(s > 0.9 && s < 1.0);
    }

    #[test]
    fn test_fit_predict_horizon() {
        let mut model = MlpForecaster::default();
        model.fit(&trend_series(60), &spec(20)).unwrap();
        let points = model.predict().unwrap();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].timestamp, NaiveDate::from_ymd_opt(2023, 3, 2).unwrap());
        assert!(points.iter().all(|p| p.predicted_value.is_finite()));
        assert_eq!(model.training_loss_history().len(), 20);
    }

    #[test]
    fn test_training_reduces_loss() {
        let mut model = MlpForecaster::default();
        model.fit(&trend_series(60), &spec(300)).unwrap();
        let history = model.training_loss_history();
        let first = history[0];
        let last = history[history.len() - 1];
        assert!(last < first * 0.1, "loss went from {} to {}", first, last);
    }

    #[test]
    fn test_same_seed_same_forecast() {
        let series = trend_series(40);
        let mut a = MlpForecaster::default();
        let mut b = MlpForecaster::default();
        a.fit(&series, &spec(30)).unwrap();
        b.fit(&series, &spec(30)).unwrap();
        assert_eq!(a.predict().unwrap(), b.predict().unwrap());
    }

    #[test]
    fn test_early_stopping_caps_steps() {
        // Batch losses on a random walk fluctuate, so new minima stop appearing
        let series = crate::generator::generate(crate::generator::GeneratorParams::default()).unwrap();
        let config = MlpConfigBuilder::new()
            .learning_rate(1e-9)
            .early_stopping_patience(Some(3))
            .build();
        let mut model = MlpForecaster::new(config);
        model.fit(&series, &spec(500)).unwrap();
        assert!(model.training_loss_history().len() < 500);
    }

    #[test]
    fn test_divergence_is_a_model_failure() {
        let config = MlpConfigBuilder::new().learning_rate(1e6).build();
        let mut model = MlpForecaster::new(config);
        let err = model.fit(&trend_series(40), &spec(200)).unwrap_err();
        assert!(matches!(err, Error::ModelFailure { .. }));
    }

    #[test]
    fn test_invalid_config_and_short_series() {
        let mut model = MlpForecaster::new(MlpConfigBuilder::new().batch_size(0).build());
        assert!(matches!(
            model.fit(&trend_series(40), &spec(1)).unwrap_err(),
            Error::InvalidParameter(_)
        ));

        let mut model = MlpForecaster::default();
        assert!(matches!(
            model.fit(&trend_series(20), &spec(1)).unwrap_err(),
            Error::ModelFailure { .. }
        ));
        assert!(model.predict().is_err());
    }
}
