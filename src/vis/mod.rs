//! Rendering of a series and its forecast
//!
//! Renderers are injected into [`crate::forecast::ForecastHarness::render`]:
//!
//! - [`TextRenderer`] writes the forecast table and an ASCII overlay chart to any writer
//! - [`NoopRenderer`] does nothing, for headless runs
//! - [`PlotRenderer`] writes a PNG or SVG chart (`visualization` feature)
//! - [`CompositeRenderer`] runs several renderers in order

pub mod ascii;
#[cfg(feature = "visualization")]
pub mod plotters_ext;
pub mod text;

use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::series::Series;

pub use self::ascii::{Chart, ChartConfig, OverlayChart, OverlayChartConfig};
#[cfg(feature = "visualization")]
pub use self::plotters_ext::PlotRenderer;
pub use self::text::TextRenderer;

/// Something that can present a series and its forecast
pub trait Renderer {
    fn render(&mut self, series: &Series, result: &ForecastResult) -> Result<()>;
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&mut self, _series: &Series, _result: &ForecastResult) -> Result<()> {
        Ok(())
    }
}

/// Runs every renderer even if an earlier one fails, then reports the first failure
#[derive(Default)]
pub struct CompositeRenderer {
    renderers: Vec<Box<dyn Renderer>>,
}

impl CompositeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    pub fn push(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl Renderer for CompositeRenderer {
    fn render(&mut self, series: &Series, result: &ForecastResult) -> Result<()> {
        let mut first_error = None;
        for renderer in &mut self.renderers {
            if let Err(e) = renderer.render(series, result) {
                log::warn!("renderer failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Titles and labels shared by every chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    /// Title; the model name is appended in parentheses
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend of the historical line
    pub history_label: String,
    /// Legend of the forecast line; `None` derives "<n>-<unit> Forecast"
    pub forecast_label: Option<String>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    pub show_grid: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            title: "Energy Price Forecast".to_string(),
            x_label: "Date".to_string(),
            y_label: "Price ($)".to_string(),
            history_label: "Historical Prices".to_string(),
            forecast_label: None,
            width: 1000,
            height: 500,
            show_grid: true,
        }
    }
}

impl ChartSettings {
    /// Title including the model that produced `result`
    pub fn title_for(&self, result: &ForecastResult) -> String {
        format!("{} ({})", self.title, result.model())
    }

    /// Forecast legend, e.g. "7-Day Forecast"
    pub fn forecast_label_for(&self, series: &Series, result: &ForecastResult) -> String {
        match &self.forecast_label {
            Some(label) => label.clone(),
            None => format!("{}-{} Forecast", result.len(), series.frequency().unit_label()),
        }
    }
}
