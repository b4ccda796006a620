//! Core library for the `fivecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location acquisition (who is asking, and where are they)
//! - The OpenWeather forecast client
//! - The daily reduction of 3-hourly samples into a 5-day summary
//! - The pipeline state machine tying the above together
//!
//! It is used by `fivecast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod reduce;

pub use config::Config;
pub use error::ForecastError;
pub use location::{FixedLocationProvider, IpLocationProvider, LocationProvider};
pub use model::{Coordinates, DailySummary, Forecast, ForecastResult, PipelineState, RawSample};
pub use pipeline::ForecastPipeline;
pub use provider::{ForecastProvider, openweather::OpenWeatherProvider};
pub use reduce::{MAX_DAYS, reduce_daily};
