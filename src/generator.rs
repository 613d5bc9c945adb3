//! Synthetic series generation
//!
//! Produces a seeded random walk: `value[i] = base_value + sum(noise[0..=i])`
//! where every noise sample is drawn from `Normal(0, noise_std)`. The random
//! number generator is created per call from the seed, so two calls with the
//! same parameters return bit-identical series.

use chrono::NaiveDate;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};
use crate::series::Series;
use crate::temporal::Frequency;

/// Parameters of a generated series
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    /// Identifier carried by every observation
    pub series_id: String,
    /// Seed of the noise generator
    pub seed: u64,
    /// Timestamp of the first observation
    pub start_date: NaiveDate,
    /// Number of observations
    pub length: usize,
    /// Sampling frequency
    pub frequency: Frequency,
    /// Level the walk starts from
    pub base_value: f64,
    /// Standard deviation of each step
    pub noise_std: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            series_id: "series".to_string(),
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            length: 100,
            frequency: Frequency::Daily,
            base_value: 80.0,
            noise_std: 0.5,
        }
    }
}

impl GeneratorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series_id(mut self, id: impl Into<String>) -> Self {
        self.series_id = id.into();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn base_value(mut self, value: f64) -> Self {
        self.base_value = value;
        self
    }

    pub fn noise_std(mut self, std: f64) -> Self {
        self.noise_std = std;
        self
    }

    fn validate(&self) -> Result<()> {
        self.frequency.validate()?;
        if self.length == 0 {
            return Err(Error::InvalidParameter(
                "length must be greater than zero".to_string(),
            ));
        }
        if self.noise_std.is_nan() || self.noise_std < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "noise_std must be non-negative, got {}",
                self.noise_std
            )));
        }
        if !self.noise_std.is_finite() {
            return Err(Error::InvalidParameter(
                "noise_std must be finite".to_string(),
            ));
        }
        if !self.base_value.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "base_value must be finite, got {}",
                self.base_value
            )));
        }
        Ok(())
    }
}

/// Random walk series generator
#[derive(Debug, Clone, Default)]
pub struct SeriesGenerator {
    params: GeneratorParams,
}

impl SeriesGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        SeriesGenerator { params }
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Generate the series described by the parameters
    pub fn generate(&self) -> Result<Series> {
        let p = &self.params;
        p.validate()?;
        debug!(
            "generating series '{}': seed={} start={} length={} freq={} base={} noise_std={}",
            p.series_id, p.seed, p.start_date, p.length, p.frequency, p.base_value, p.noise_std
        );

        let noise = Normal::new(0.0, p.noise_std)
            .map_err(|e| Error::InvalidParameter(format!("noise distribution: {}", e)))?;
        let mut rng = StdRng::seed_from_u64(p.seed);

        let mut level = p.base_value;
        let values: Vec<f64> = (0..p.length)
            .map(|_| {
                level += noise.sample(&mut rng);
                level
            })
            .collect();

        Series::from_values(p.series_id.clone(), p.start_date, p.frequency, values)
    }
}

/// Generate a series in one call
pub fn generate(params: GeneratorParams) -> Result<Series> {
    SeriesGenerator::new(params).generate()
}
