//! File output for series and forecasts

pub mod csv;

pub use self::csv::{write_forecast_csv, write_series_csv};
