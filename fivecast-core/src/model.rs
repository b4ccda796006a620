use crate::error::ForecastError;
use serde::{Deserialize, Serialize};

/// A validated geographic position. Immutable once obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting non-finite or out-of-range values.
    ///
    /// Passing out-of-range values is a caller bug, not a condition the
    /// pipeline recovers from, so this is the only place they are checked.
    pub fn new(latitude: f64, longitude: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            latitude.is_finite() && (-90.0..=90.0).contains(&latitude),
            "latitude {latitude} is outside [-90, 90]"
        );
        anyhow::ensure!(
            longitude.is_finite() && (-180.0..=180.0).contains(&longitude),
            "longitude {longitude} is outside [-180, 180]"
        );

        Ok(Self { latitude, longitude })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// One 3-hourly forecast entry as returned by the provider. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Epoch seconds, UTC.
    pub timestamp_utc: i64,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
}

/// Raw provider output: the city the provider resolved the coordinates to,
/// plus its samples in ascending timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub city_name: String,
    pub samples: Vec<RawSample>,
}

/// The representative sample chosen for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar date key, `%Y-%m-%d`.
    pub date: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
}

/// Terminal artifact of a successful pipeline cycle.
///
/// `days` holds at most one summary per distinct date, ordered by the first
/// occurrence of each date in the provider stream, truncated to 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub city_name: String,
    pub days: Vec<DailySummary>,
}

/// Pipeline state exposed to the presentation layer. Exactly one state is
/// current at any time; `Ready` and `Failed` are terminal for a cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    AwaitingLocation,
    AwaitingForecast,
    Ready(ForecastResult),
    Failed(ForecastError),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_accept_valid_range() {
        assert!(Coordinates::new(37.57, 126.98).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.0, -180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(90.01, 0.0).is_err());
        assert!(Coordinates::new(-90.01, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.01).is_err());
        assert!(Coordinates::new(0.0, -180.01).is_err());
    }

    #[test]
    fn coordinates_reject_non_finite() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn default_pipeline_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
        assert!(!PipelineState::Idle.is_terminal());
        assert!(PipelineState::Failed(ForecastError::location("x")).is_terminal());
    }
}
