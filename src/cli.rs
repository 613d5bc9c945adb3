//! Command-line arguments and how they override the configuration file

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::forecast::ModelKind;
use crate::temporal::{parse_date, Frequency};

/// Generate a synthetic series, forecast it, and chart the result
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "seriescast", version, about)]
pub struct Cli {
    /// TOML configuration file; flags given here take precedence over it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed of the synthetic series
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of generated observations
    #[arg(long)]
    pub length: Option<usize>,

    /// First timestamp (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Sampling frequency (D, W, M, Q, Y or multiples such as 3D)
    #[arg(long)]
    pub frequency: Option<Frequency>,

    /// Starting level of the random walk
    #[arg(long, allow_negative_numbers = true)]
    pub base_value: Option<f64>,

    /// Standard deviation of each random-walk step
    #[arg(long)]
    pub noise_std: Option<f64>,

    #[arg(long)]
    pub series_id: Option<String>,

    /// Forecasting model (mlp, naive, drift)
    #[arg(short, long)]
    pub model: Option<ModelKind>,

    /// Number of future steps to predict
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Past observations the model sees per prediction
    #[arg(long)]
    pub lookback: Option<usize>,

    /// Training steps the model may spend
    #[arg(long)]
    pub budget: Option<usize>,

    /// Write a PNG or SVG chart (needs the `visualization` feature)
    #[arg(long, value_name = "FILE")]
    pub chart: Option<PathBuf>,

    /// Write the forecast as CSV
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Write the generated series as CSV
    #[arg(long, value_name = "FILE")]
    pub series_csv: Option<PathBuf>,

    /// Print the table without the ASCII chart
    #[arg(long)]
    pub no_plot: bool,

    /// Raise the log level (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Configuration file (or defaults) with every given flag applied on top
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut PipelineConfig) {
        let generator = &mut config.generator;
        if let Some(seed) = self.seed {
            generator.seed = seed;
        }
        if let Some(length) = self.length {
            generator.length = length;
        }
        if let Some(start_date) = self.start_date {
            generator.start_date = start_date;
        }
        if let Some(frequency) = self.frequency {
            generator.frequency = frequency;
        }
        if let Some(base_value) = self.base_value {
            generator.base_value = base_value;
        }
        if let Some(noise_std) = self.noise_std {
            generator.noise_std = noise_std;
        }
        if let Some(series_id) = &self.series_id {
            generator.series_id = series_id.clone();
        }

        let forecast = &mut config.forecast;
        if let Some(model) = self.model {
            forecast.model = model;
        }
        if let Some(horizon) = self.horizon {
            forecast.horizon = horizon;
        }
        if let Some(lookback) = self.lookback {
            forecast.lookback_window = lookback;
        }
        if let Some(budget) = self.budget {
            forecast.training_budget = budget;
        }

        let render = &mut config.render;
        if let Some(chart) = &self.chart {
            render.chart_path = Some(chart.clone());
        }
        if let Some(csv) = &self.csv {
            render.csv_path = Some(csv.clone());
        }
        if let Some(series_csv) = &self.series_csv {
            render.series_csv_path = Some(series_csv.clone());
        }
        if self.no_plot {
            render.plot = false;
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "seriescast=warn",
            1 => "seriescast=info",
            _ => "seriescast=debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_default_config() {
        let cli = Cli::try_parse_from(["seriescast"]).unwrap();
        assert_eq!(cli.resolve_config().unwrap(), PipelineConfig::default());
        assert_eq!(cli.log_directive(), "seriescast=warn");
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::try_parse_from([
            "seriescast",
            "--seed",
            "7",
            "--start-date",
            "2024-03-01",
            "--frequency",
            "W",
            "--base-value=-5",
            "--model",
            "drift",
            "--horizon",
            "3",
            "--lookback",
            "5",
            "--no-plot",
            "-vv",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(config.generator.frequency, Frequency::Weekly);
        assert_eq!(config.generator.base_value, -5.0);
        assert_eq!(config.forecast.model, ModelKind::Drift);
        assert_eq!(config.forecast.horizon, 3);
        assert_eq!(config.forecast.lookback_window, 5);
        assert_eq!(config.forecast.training_budget, 300);
        assert!(!config.render.plot);
        assert_eq!(cli.log_directive(), "seriescast=debug");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["seriescast", "--model", "arima"]).is_err());
        assert!(Cli::try_parse_from(["seriescast", "--start-date", "01/01/2023"]).is_err());
        assert!(Cli::try_parse_from(["seriescast", "--horizon", "-1"]).is_err());
    }
}
