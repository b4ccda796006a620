//! Location acquisition: where is the caller right now?
//!
//! The default implementation uses ip-api.com, a free keyless IP geolocation
//! service, as the terminal-world stand-in for a platform geolocation API.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ForecastError;
use crate::model::Coordinates;

pub const DEFAULT_BASE_URL: &str = "http://ip-api.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Obtains the caller's current coordinates. Each call resolves exactly once,
/// with coordinates or an error, and cannot hang past its timeout.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_location(&self) -> Result<Coordinates, ForecastError>;
}

/// IP-based geolocation against ip-api.com.
#[derive(Debug, Clone)]
pub struct IpLocationProvider {
    base_url: String,
    http: Client,
}

impl IpLocationProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Point the provider at a different endpoint, e.g. a mock server.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

impl Default for IpLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_location(&self) -> Result<Coordinates, ForecastError> {
        let url = format!("{}/json", self.base_url);

        let res = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ForecastError::location(format!("geolocation request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::location(format!(
                "geolocation service returned status {status}"
            )));
        }

        let parsed: IpApiResponse = res
            .json()
            .await
            .map_err(|e| ForecastError::location(format!("malformed geolocation response: {e}")))?;

        if parsed.status != "success" {
            let message = parsed.message.unwrap_or_else(|| "position unavailable".to_string());
            return Err(ForecastError::location(message));
        }

        let (Some(lat), Some(lon)) = (parsed.lat, parsed.lon) else {
            return Err(ForecastError::location(
                "geolocation response carried no coordinates",
            ));
        };

        let coordinates = Coordinates::new(lat, lon)
            .map_err(|e| ForecastError::location(e.to_string()))?;

        tracing::debug!(%coordinates, "resolved current location");
        Ok(coordinates)
    }
}

/// A fixed position supplied by the caller, bypassing any lookup.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Result<Coordinates, ForecastError> {
        Ok(self.0)
    }
}
