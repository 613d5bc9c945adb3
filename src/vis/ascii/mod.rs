//! Text-based charts for terminal output

mod charts;

pub use charts::{OverlayChart, OverlayChartConfig};

/// Chart rendering trait
pub trait Chart {
    /// Render the chart to a string
    fn render(&self) -> String;
}

/// Common chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Plot area width in characters
    pub width: usize,
    /// Plot area height in characters
    pub height: usize,
    /// Show axis labels
    pub show_labels: bool,
    /// Title for the chart
    pub title: Option<String>,
    /// X-axis label
    pub x_label: Option<String>,
    /// Y-axis label
    pub y_label: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 72,
            height: 16,
            show_labels: true,
            title: None,
            x_label: None,
            y_label: None,
        }
    }
}
