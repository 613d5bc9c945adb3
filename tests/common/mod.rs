//! Shared fixtures for the integration tests

#![allow(dead_code)]

pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{
    date, linear_series, reference_params, reference_request, reference_series, CannedForecaster,
};
