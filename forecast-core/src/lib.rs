//! Core library for the `forecast` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather 5-day forecast HTTP client
//! - The forecast controller (debounced query -> fetch lifecycle)
//! - Pure display derivations (weekday/time/temperature formatting)
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod controller;
pub mod display;
pub mod model;

pub use client::{ClientError, ForecastSource, OpenWeatherClient};
pub use config::Config;
pub use controller::{ForecastController, DEBOUNCE_DELAY, MIN_QUERY_LEN};
pub use model::ForecastEntry;
