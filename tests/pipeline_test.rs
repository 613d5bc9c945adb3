use std::fs;
use std::io::Write;

use clap::Parser;
use seriescast::cli::Cli;
use seriescast::forecast::ModelKind;
use seriescast::pipeline;
use seriescast::{Error, PipelineConfig};
use tempfile::{tempdir, NamedTempFile};

fn drift_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.forecast.model = ModelKind::Drift;
    config
}

#[test]
fn test_table_and_csv_outputs() {
    let dir = tempdir().unwrap();
    let mut config = drift_config();
    config.render.plot = false;
    config.render.csv_path = Some(dir.path().join("forecast.csv"));
    config.render.series_csv_path = Some(dir.path().join("series.csv"));

    let mut out = Vec::new();
    let report = pipeline::run(&config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Energy Price Forecast (Drift): next 7 days"));
    assert!(!text.contains('●'));

    let forecast = fs::read_to_string(dir.path().join("forecast.csv")).unwrap();
    let lines: Vec<&str> = forecast.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "series_id,timestamp,predicted_value");
    assert!(lines[1].starts_with("oil,2023-04-11,"));
    assert!(lines[7].starts_with("oil,2023-04-17,"));

    let series = fs::read_to_string(dir.path().join("series.csv")).unwrap();
    assert_eq!(series.lines().count(), 101);
    assert_eq!(series.lines().next(), Some("series_id,timestamp,value"));
    assert_eq!(report.series.len(), 100);
}

#[test]
fn test_runs_are_deterministic() {
    let mut a = Vec::new();
    let mut b = Vec::new();
    pipeline::run(&drift_config(), &mut a).unwrap();
    pipeline::run(&drift_config(), &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_flags_override_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[generator]\nseed = 1\nlength = 60\n\n[forecast]\nmodel = \"naive\"\nhorizon = 5"
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let cli = Cli::try_parse_from(["seriescast", "--config", &path, "--horizon", "3"]).unwrap();
    let config = cli.resolve_config().unwrap();
    assert_eq!(config.generator.seed, 1);
    assert_eq!(config.generator.length, 60);
    assert_eq!(config.forecast.model, ModelKind::Naive);
    assert_eq!(config.forecast.horizon, 3);

    let mut out = Vec::new();
    let report = pipeline::run(&config, &mut out).unwrap();
    assert_eq!(report.result.len(), 3);
}

#[test]
fn test_bad_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[forecast]\nunknown_key = 1").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let cli = Cli::try_parse_from(["seriescast", "--config", &path]).unwrap();
    assert!(matches!(cli.resolve_config(), Err(Error::Config(_))));
}

#[test]
fn test_failures_before_table_print_nothing() {
    let mut config = drift_config();
    config.generator.noise_std = -0.5;
    let mut out = Vec::new();
    assert!(matches!(
        pipeline::run(&config, &mut out),
        Err(Error::InvalidParameter(_))
    ));
    assert!(out.is_empty());

    let mut config = drift_config();
    config.forecast.lookback_window = 0;
    assert!(matches!(
        pipeline::run(&config, &mut out),
        Err(Error::InvalidParameter(_))
    ));
    assert!(out.is_empty());
}

#[cfg(feature = "visualization")]
#[test]
fn test_unwritable_chart_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let mut config = drift_config();
    config.render.chart_path = Some(dir.path().join("missing").join("forecast.png"));

    let mut out = Vec::new();
    let report = pipeline::run(&config, &mut out).unwrap();
    assert!(report.render_error.is_some());
    assert!(!out.is_empty());
}
