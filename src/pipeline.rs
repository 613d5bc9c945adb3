//! End-to-end run: generate, fit, predict, write outputs, render

use std::io::Write;

use log::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::forecast::{ForecastHarness, ForecastResult};
use crate::generator::generate;
use crate::io::{write_forecast_csv, write_series_csv};
use crate::series::Series;
use crate::vis::TextRenderer;

/// What a completed run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub series: Series,
    pub result: ForecastResult,
    /// Chart failure after the table was written; the run still counts as done
    pub render_error: Option<Error>,
}

/// Run the whole pipeline, writing the table (and ASCII chart) to `out`.
///
/// Anything that fails before the table is written is returned as an error.
/// A chart (ASCII or file) that cannot be drawn afterwards is reported in
/// [`PipelineReport::render_error`].
pub fn run<W: Write>(config: &PipelineConfig, mut out: W) -> Result<PipelineReport> {
    check_chart_support(config)?;

    let series = generate(config.generator.params())?;
    info!(
        "generated series '{}' with {} observations ({} to {})",
        series.id(),
        series.len(),
        series.first_timestamp(),
        series.last_timestamp()
    );

    let request = config.forecast.request()?;
    let mut harness = ForecastHarness::new(config.forecast.build_model());
    harness.fit(series, request)?;
    let result = harness.predict()?;
    info!("{} produced {} forecast points", result.model(), result.len());

    if let Some(path) = &config.render.csv_path {
        write_forecast_csv(&result, path)?;
    }
    if let Some(path) = &config.render.series_csv_path {
        if let Some(series) = harness.series() {
            write_series_csv(series, path)?;
        }
    }

    let settings = config.render.chart_settings();
    let mut table = TextRenderer::new(&mut out, settings.clone()).without_chart();
    harness.render(&mut table)?;

    let mut render_error = None;
    if config.render.plot {
        let mut chart = TextRenderer::new(&mut out, settings.clone()).without_table();
        if let Err(e) = harness.render(&mut chart) {
            warn!("ASCII chart rendering failed: {}", e);
            render_error = Some(e);
        }
    }
    if let Err(e) = render_chart_file(&harness, config, settings) {
        warn!("chart rendering failed: {}", e);
        render_error.get_or_insert(e);
    }

    let series = match harness.series() {
        Some(series) => series.clone(),
        None => {
            return Err(Error::InvalidState {
                operation: "report",
                state: harness.state().as_str(),
            })
        }
    };

    Ok(PipelineReport {
        series,
        result,
        render_error,
    })
}

#[cfg(feature = "visualization")]
fn check_chart_support(_config: &PipelineConfig) -> Result<()> {
    Ok(())
}

#[cfg(not(feature = "visualization"))]
fn check_chart_support(config: &PipelineConfig) -> Result<()> {
    match &config.render.chart_path {
        Some(path) => Err(Error::Visualization(format!(
            "cannot write {}: chart output requires the `visualization` feature",
            path.display()
        ))),
        None => Ok(()),
    }
}

#[cfg(feature = "visualization")]
fn render_chart_file<M: crate::forecast::Forecaster>(
    harness: &ForecastHarness<M>,
    config: &PipelineConfig,
    settings: crate::vis::ChartSettings,
) -> Result<()> {
    match &config.render.chart_path {
        Some(path) => {
            let mut renderer = crate::vis::PlotRenderer::new(path, settings);
            harness.render(&mut renderer)
        }
        None => Ok(()),
    }
}

#[cfg(not(feature = "visualization"))]
fn render_chart_file<M: crate::forecast::Forecaster>(
    _harness: &ForecastHarness<M>,
    _config: &PipelineConfig,
    _settings: crate::vis::ChartSettings,
) -> Result<()> {
    Ok(())
}
