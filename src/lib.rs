//! Synthetic time-series generation and single-model forecasting
//!
//! A seeded random walk is generated ([`generator`]), handed to a
//! [`forecast::ForecastHarness`] that fits one model and predicts a fixed
//! horizon, and the result is rendered as a table and chart ([`vis`]) or
//! written to CSV ([`io`]).
//!
//! ```no_run
//! use seriescast::forecast::{ForecastHarness, ForecastRequest, MlpForecaster};
//! use seriescast::generator::{generate, GeneratorParams};
//! use seriescast::vis::{ChartSettings, TextRenderer};
//!
//! # fn main() -> seriescast::Result<()> {
//! let series = generate(GeneratorParams::new().series_id("oil"))?;
//! let mut harness = ForecastHarness::new(MlpForecaster::default());
//! harness.fit(series, ForecastRequest::new(7, 14, 300)?)?;
//! let result = harness.predict()?;
//! println!("{}", result);
//! harness.render(&mut TextRenderer::stdout(ChartSettings::default()))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod forecast;
pub mod generator;
pub mod io;
pub mod pipeline;
pub mod series;
pub mod temporal;
pub mod vis;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use forecast::{ForecastHarness, ForecastRequest, ForecastResult, Forecaster};
pub use generator::{GeneratorParams, SeriesGenerator};
pub use series::{Observation, Series};
pub use temporal::Frequency;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
