//! Forecast listing and ASCII chart written to any `io::Write`

use std::io::{self, Stdout, Write};

use super::ascii::{Chart, ChartConfig, OverlayChart, OverlayChartConfig};
use super::{ChartSettings, Renderer};
use crate::error::Result;
use crate::forecast::ForecastResult;
use crate::series::Series;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes the forecast table, then (unless disabled) an overlay chart
pub struct TextRenderer<W: Write> {
    writer: W,
    settings: ChartSettings,
    table: bool,
    chart: Option<ChartConfig>,
}

impl TextRenderer<Stdout> {
    pub fn stdout(settings: ChartSettings) -> Self {
        TextRenderer::new(io::stdout(), settings)
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W, settings: ChartSettings) -> Self {
        TextRenderer {
            writer,
            settings,
            table: true,
            chart: Some(ChartConfig::default()),
        }
    }

    /// Table only, no chart
    pub fn without_chart(mut self) -> Self {
        self.chart = None;
        self
    }

    /// Chart only, for output that already carries the table
    pub fn without_table(mut self) -> Self {
        self.table = false;
        self
    }

    /// Size of the chart's plot area in characters
    pub fn with_chart_size(mut self, width: usize, height: usize) -> Self {
        let mut config = self.chart.unwrap_or_default();
        config.width = width;
        config.height = height;
        self.chart = Some(config);
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn heading(&self, series: &Series, result: &ForecastResult) -> String {
        let unit = series.frequency().unit_label().to_lowercase();
        let plural = if result.len() == 1 { "" } else { "s" };
        format!(
            "{}: next {} {}{}",
            self.settings.title_for(result),
            result.len(),
            unit,
            plural
        )
    }

    fn overlay(&self, base: &ChartConfig, series: &Series, result: &ForecastResult) -> OverlayChart {
        let config = OverlayChartConfig {
            base: ChartConfig {
                title: Some(self.settings.title_for(result)),
                x_label: Some(self.settings.x_label.clone()),
                y_label: Some(self.settings.y_label.clone()),
                ..base.clone()
            },
            history_label: self.settings.history_label.clone(),
            forecast_label: self.settings.forecast_label_for(series, result),
            ..OverlayChartConfig::default()
        };

        let chart = OverlayChart::with_config(&series.values(), &result.values(), config);
        let last = result
            .timestamps()
            .last()
            .copied()
            .unwrap_or_else(|| series.last_timestamp());
        chart.with_x_bounds(
            series.first_timestamp().format(DATE_FORMAT).to_string(),
            last.format(DATE_FORMAT).to_string(),
        )
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, series: &Series, result: &ForecastResult) -> Result<()> {
        if self.table {
            let heading = self.heading(series, result);
            writeln!(self.writer, "{}\n", heading)?;
            write!(self.writer, "{}", result)?;
            self.writer.flush()?;
        }

        if let Some(base) = &self.chart {
            let chart = self.overlay(base, series, result);
            writeln!(self.writer)?;
            write!(self.writer, "{}", chart.render())?;
            self.writer.flush()?;
        }
        Ok(())
    }
}
