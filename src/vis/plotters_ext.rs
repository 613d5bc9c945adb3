//! PNG/SVG charts via plotters

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{ChartSettings, Renderer};
use crate::error::{Error, Result};
use crate::forecast::ForecastResult;
use crate::series::Series;

const HISTORY_COLOR: RGBColor = RGBColor(31, 119, 180);
const FORECAST_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Writes the overlay chart to an image file; the format follows the extension
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    path: PathBuf,
    settings: ChartSettings,
}

impl PlotRenderer {
    pub fn new(path: impl Into<PathBuf>, settings: ChartSettings) -> Self {
        PlotRenderer {
            path: path.into(),
            settings,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for PlotRenderer {
    fn render(&mut self, series: &Series, result: &ForecastResult) -> Result<()> {
        let size = (self.settings.width, self.settings.height);
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("svg") => {
                let root = SVGBackend::new(&self.path, size).into_drawing_area();
                draw_overlay(&root, series, result, &self.settings)?;
                root.present()?;
            }
            Some("png") => {
                let root = BitMapBackend::new(&self.path, size).into_drawing_area();
                draw_overlay(&root, series, result, &self.settings)?;
                root.present()?;
            }
            _ => {
                return Err(Error::Visualization(format!(
                    "unsupported chart format for '{}' (expected .png or .svg)",
                    self.path.display()
                )))
            }
        }

        log::info!("chart written to {}", self.path.display());
        Ok(())
    }
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn draw_overlay<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &Series,
    result: &ForecastResult,
    settings: &ChartSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let origin = series.first_timestamp();
    let history: Vec<(f64, f64)> = series
        .observations()
        .iter()
        .map(|obs| (day_offset(origin, obs.timestamp), obs.value))
        .collect();
    let forecast: Vec<(f64, f64)> = result
        .points()
        .iter()
        .map(|p| (day_offset(origin, p.timestamp), p.predicted_value))
        .collect();

    let all = history.iter().chain(&forecast);
    let (x_min, x_max, y_min, y_max) = all.fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    );
    let x_margin = ((x_max - x_min) * 0.02).max(1.0);
    let y_margin = ((y_max - y_min) * 0.05).max(1.0);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(settings.title_for(result), ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (x_min - x_margin)..(x_max + x_margin),
            (y_min - y_margin)..(y_max + y_margin),
        )?;

    let date_label = |x: &f64| {
        origin
            .checked_add_signed(Duration::days(x.round() as i64))
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    let value_label = |y: &f64| format!("{:.1}", y);

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(8)
        .y_labels(10)
        .x_label_formatter(&date_label)
        .y_label_formatter(&value_label)
        .x_desc(settings.x_label.as_str())
        .y_desc(settings.y_label.as_str());
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart
        .draw_series(LineSeries::new(
            history.iter().copied(),
            HISTORY_COLOR.stroke_width(2),
        ))?
        .label(settings.history_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], HISTORY_COLOR));

    // The dashed line starts at the last observation so the two lines join
    let dashed: Vec<(f64, f64)> = history.last().into_iter().chain(&forecast).copied().collect();
    chart
        .draw_series(DashedLineSeries::new(
            dashed,
            10,
            5,
            FORECAST_COLOR.stroke_width(2),
        ))?
        .label(settings.forecast_label_for(series, result))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST_COLOR));

    chart.draw_series(
        forecast
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, FORECAST_COLOR.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
