use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::ForecastError;
use crate::model::{Coordinates, Forecast};

pub mod openweather;

/// A remote multi-day forecast source.
///
/// Implementations issue at most one request per call, preserve the
/// provider's chronological sample order, and never retry; retry policy, if
/// any, belongs to the caller.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<Forecast, ForecastError>;
}
