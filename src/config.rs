//! Pipeline configuration loaded from TOML
//!
//! Every section and field is optional; missing values take the defaults of
//! the reference scenario (100 daily points from 2023-01-01 around 80.0,
//! a 7-step MLP forecast over a 14-step lookback, 300 training steps).
//!
//! ```toml
//! [generator]
//! series_id = "oil"
//! seed = 42
//! start_date = "2023-01-01"
//! frequency = "D"
//!
//! [forecast]
//! model = "mlp"
//! horizon = 7
//! lookback_window = 14
//! training_budget = 300
//!
//! [render]
//! chart_path = "forecast.png"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forecast::{Forecaster, ForecastRequest, MlpConfig, ModelKind};
use crate::generator::GeneratorParams;
use crate::temporal::Frequency;
use crate::vis::ChartSettings;

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub generator: GeneratorConfig,
    pub forecast: ForecastConfig,
    pub render: RenderConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Synthetic series section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub series_id: String,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub length: usize,
    pub frequency: Frequency,
    pub base_value: f64,
    pub noise_std: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let params = GeneratorParams::default();
        GeneratorConfig {
            series_id: "oil".to_string(),
            seed: params.seed,
            start_date: params.start_date,
            length: params.length,
            frequency: params.frequency,
            base_value: params.base_value,
            noise_std: params.noise_std,
        }
    }
}

impl GeneratorConfig {
    pub fn params(&self) -> GeneratorParams {
        GeneratorParams::new()
            .series_id(self.series_id.clone())
            .seed(self.seed)
            .start_date(self.start_date)
            .length(self.length)
            .frequency(self.frequency)
            .base_value(self.base_value)
            .noise_std(self.noise_std)
    }
}

/// Model and request section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub model: ModelKind,
    pub horizon: usize,
    pub lookback_window: usize,
    pub training_budget: usize,
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub model_seed: u64,
    pub early_stopping_patience: Option<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let mlp = MlpConfig::default();
        ForecastConfig {
            model: ModelKind::default(),
            horizon: 7,
            lookback_window: 14,
            training_budget: 300,
            hidden_layers: mlp.hidden_layers,
            learning_rate: mlp.learning_rate,
            batch_size: mlp.batch_size,
            model_seed: mlp.random_seed,
            early_stopping_patience: mlp.early_stopping_patience,
        }
    }
}

impl ForecastConfig {
    pub fn request(&self) -> Result<ForecastRequest> {
        ForecastRequest::new(self.horizon, self.lookback_window, self.training_budget)
    }

    pub fn mlp_config(&self) -> MlpConfig {
        MlpConfig {
            hidden_layers: self.hidden_layers.clone(),
            learning_rate: self.learning_rate,
            batch_size: self.batch_size,
            random_seed: self.model_seed,
            early_stopping_patience: self.early_stopping_patience,
            ..MlpConfig::default()
        }
    }

    pub fn build_model(&self) -> Box<dyn Forecaster> {
        self.model.build(self.mlp_config())
    }
}

/// Output section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Draw the ASCII chart after the table
    pub plot: bool,
    /// PNG or SVG chart output
    pub chart_path: Option<PathBuf>,
    /// Forecast CSV output
    pub csv_path: Option<PathBuf>,
    /// Generated series CSV output
    pub series_csv_path: Option<PathBuf>,
    /// Image size in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let settings = ChartSettings::default();
        RenderConfig {
            plot: true,
            chart_path: None,
            csv_path: None,
            series_csv_path: None,
            width: settings.width,
            height: settings.height,
        }
    }
}

impl RenderConfig {
    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            width: self.width,
            height: self.height,
            ..ChartSettings::default()
        }
    }
}
