//! History/forecast overlay chart

use super::{Chart, ChartConfig};

/// Configuration for the overlay chart
#[derive(Debug, Clone)]
pub struct OverlayChartConfig {
    /// Base chart config
    pub base: ChartConfig,
    /// Marker for observed points
    pub history_char: char,
    /// Fill between observed points
    pub history_line_char: char,
    /// Marker for forecast points
    pub forecast_char: char,
    /// Fill between forecast points, and from the last observation to the first forecast
    pub dash_char: char,
    pub history_label: String,
    pub forecast_label: String,
}

impl Default for OverlayChartConfig {
    fn default() -> Self {
        Self {
            base: ChartConfig::default(),
            history_char: '●',
            history_line_char: '─',
            forecast_char: '○',
            dash_char: '┄',
            history_label: "History".to_string(),
            forecast_label: "Forecast".to_string(),
        }
    }
}

/// History and forecast drawn against one shared time axis
///
/// The forecast continues the history: point `i` of the forecast sits at
/// time index `history.len() + i`.
#[derive(Debug, Clone)]
pub struct OverlayChart {
    history: Vec<f64>,
    forecast: Vec<f64>,
    x_bounds: Option<(String, String)>,
    config: OverlayChartConfig,
}

impl OverlayChart {
    pub fn new(history: &[f64], forecast: &[f64]) -> Self {
        Self::with_config(history, forecast, OverlayChartConfig::default())
    }

    pub fn with_config(history: &[f64], forecast: &[f64], config: OverlayChartConfig) -> Self {
        Self {
            history: history.to_vec(),
            forecast: forecast.to_vec(),
            x_bounds: None,
            config,
        }
    }

    /// Labels printed under the left and right ends of the x axis
    pub fn with_x_bounds(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.x_bounds = Some((first.into(), last.into()));
        self
    }

    fn values(&self) -> Vec<f64> {
        self.history.iter().chain(&self.forecast).copied().collect()
    }
}

const MARGIN: usize = 10;

impl Chart for OverlayChart {
    fn render(&self) -> String {
        let values = self.values();
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (min_val, max_val) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min_val.is_finite() {
            return String::from("No data to display");
        }
        let range = if (max_val - min_val).abs() < f64::EPSILON {
            1.0
        } else {
            max_val - min_val
        };

        let config = &self.config;
        let width = config.base.width.max(2);
        let height = config.base.height.max(2);
        let total = values.len();

        let row_of = |v: f64| {
            let row = ((v - min_val) / range * (height - 1) as f64).round() as usize;
            row.min(height - 1)
        };
        let col_of = |i: usize| {
            if total == 1 {
                0
            } else {
                ((i * (width - 1)) as f64 / (total - 1) as f64).round() as usize
            }
        };

        // grid[0] is the bottom row
        let mut grid = vec![vec![' '; width]; height];

        for i in 1..total {
            let (v0, v1) = (values[i - 1], values[i]);
            if !v0.is_finite() || !v1.is_finite() {
                continue;
            }
            let (c0, c1) = (col_of(i - 1), col_of(i));
            let fill = if i < self.history.len() {
                config.history_line_char
            } else {
                config.dash_char
            };
            for c in c0 + 1..c1 {
                let t = (c - c0) as f64 / (c1 - c0) as f64;
                let cell = &mut grid[row_of(v0 + (v1 - v0) * t)][c];
                if *cell == ' ' {
                    *cell = fill;
                }
            }
        }

        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            grid[row_of(v)][col_of(i)] = if i < self.history.len() {
                config.history_char
            } else {
                config.forecast_char
            };
        }

        let mut output = String::new();

        if let Some(ref title) = config.base.title {
            output.push_str(&format!(
                "{:>margin$}{:^width$}\n\n",
                "",
                title,
                margin = MARGIN,
                width = width
            ));
        }
        if config.base.show_labels {
            if let Some(ref y_label) = config.base.y_label {
                output.push_str(&format!("{:>margin$}\n", y_label, margin = MARGIN - 2));
            }
        }

        for row in (0..height).rev() {
            if config.base.show_labels {
                let y_val = min_val + (row as f64 / (height - 1) as f64) * range;
                output.push_str(&format!("{:>8.2} │", y_val));
            }
            let line: String = grid[row].iter().collect();
            output.push_str(line.trim_end());
            output.push('\n');
        }

        if config.base.show_labels {
            output.push_str(&format!("{:>margin$}└", "", margin = MARGIN - 1));
            output.push_str(&"─".repeat(width));
            output.push('\n');

            if let Some((ref first, ref last)) = self.x_bounds {
                let gap = (width + 1).saturating_sub(first.chars().count() + last.chars().count());
                output.push_str(&format!(
                    "{:>margin$}{}{}{}\n",
                    "",
                    first,
                    " ".repeat(gap.max(1)),
                    last,
                    margin = MARGIN - 1
                ));
            }
            if let Some(ref x_label) = config.base.x_label {
                output.push_str(&format!(
                    "{:>margin$}{:^width$}\n",
                    "",
                    x_label,
                    margin = MARGIN,
                    width = width
                ));
            }
        }

        output.push_str(&format!(
            "{:>margin$}{} {}   {} {}\n",
            "",
            config.history_char,
            config.history_label,
            config.forecast_char,
            config.forecast_label,
            margin = MARGIN
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> OverlayChartConfig {
        OverlayChartConfig {
            base: ChartConfig {
                width: 10,
                height: 3,
                ..ChartConfig::default()
            },
            ..OverlayChartConfig::default()
        }
    }

    #[test]
    fn test_empty_chart() {
        let chart = OverlayChart::new(&[], &[]);
        assert_eq!(chart.render(), "No data to display");
    }

    #[test]
    fn test_markers_and_connectors() {
        let chart = OverlayChart::with_config(&[1.0, 2.0], &[3.0], small_config());
        let output = chart.render();
        let lines: Vec<&str> = output.lines().collect();

        // Highest value is the forecast point at the right edge of the top row
        assert!(lines[0].starts_with("    3.00 │"));
        assert!(lines[0].ends_with('○'));
        assert!(lines[2].starts_with("    1.00 │●"));
        assert!(lines[1].contains('─'));
        assert!(lines[1].contains('┄'));
    }

    #[test]
    fn test_labels_and_legend() {
        let mut config = small_config();
        config.base.title = Some("Prices".to_string());
        config.base.x_label = Some("Date".to_string());
        config.base.y_label = Some("Price".to_string());
        config.history_label = "Historical Prices".to_string();
        config.forecast_label = "2-Day Forecast".to_string();

        let output = OverlayChart::with_config(&[5.0, 6.0, 7.0], &[7.5, 8.0], config)
            .with_x_bounds("2023-01-01", "2023-01-05")
            .render();

        assert!(output.contains("Prices"));
        assert!(output.contains("Price\n"));
        assert!(output.contains("Date"));
        assert!(output.contains("2023-01-01"));
        assert!(output.contains("2023-01-05"));
        assert!(output.contains("● Historical Prices"));
        assert!(output.contains("○ 2-Day Forecast"));
    }

    #[test]
    fn test_flat_series() {
        let output = OverlayChart::with_config(&[4.0, 4.0], &[4.0], small_config()).render();
        let lines: Vec<&str> = output.lines().collect();
        // Every point lands on the bottom row
        assert!(lines[2].contains('●'));
        assert!(lines[2].contains('○'));
        assert!(!lines[0].contains('●'));
    }

    #[test]
    fn test_more_points_than_columns() {
        let history: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let output = OverlayChart::with_config(&history, &[200.0, 201.0], small_config()).render();
        assert!(output.contains('○'));
        for line in output.lines().take(3) {
            assert!(line.chars().count() <= 10 + 10);
        }
    }
}
