//! Concrete forecasting models

mod baseline;
mod neural;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::forecast::Forecaster;

pub use baseline::{DriftForecaster, NaiveForecaster};
pub use neural::{Activation, MlpConfig, MlpConfigBuilder, MlpForecaster};

/// Selectable model family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Mlp,
    Naive,
    Drift,
}

impl ModelKind {
    /// Instantiate the model; `mlp` is only used by [`ModelKind::Mlp`]
    pub fn build(&self, mlp: MlpConfig) -> Box<dyn Forecaster> {
        match self {
            ModelKind::Mlp => Box::new(MlpForecaster::new(mlp)),
            ModelKind::Naive => Box::new(NaiveForecaster::new()),
            ModelKind::Drift => Box::new(DriftForecaster::new()),
        }
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mlp" | "neural" | "nn" => Ok(ModelKind::Mlp),
            "naive" | "last" => Ok(ModelKind::Naive),
            "drift" => Ok(ModelKind::Drift),
            other => Err(Error::InvalidParameter(format!(
                "unknown model '{}' (expected mlp, naive or drift)",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Mlp => write!(f, "mlp"),
            ModelKind::Naive => write!(f, "naive"),
            ModelKind::Drift => write!(f, "drift"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parse() {
        assert_eq!("MLP".parse::<ModelKind>().unwrap(), ModelKind::Mlp);
        assert_eq!("naive".parse::<ModelKind>().unwrap(), ModelKind::Naive);
        assert_eq!(" drift ".parse::<ModelKind>().unwrap(), ModelKind::Drift);
        assert!("nbeats".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_build_names() {
        assert_eq!(ModelKind::Mlp.build(MlpConfig::default()).name(), "MLP");
        assert_eq!(ModelKind::Naive.build(MlpConfig::default()).name(), "Naive");
        assert_eq!(ModelKind::Drift.build(MlpConfig::default()).name(), "Drift");
    }
}
