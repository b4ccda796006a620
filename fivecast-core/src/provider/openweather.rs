use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ForecastError;
use crate::model::{Coordinates, Forecast, RawSample};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeather 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    // Entries are re-parsed one by one so a single malformed entry is
    // skipped instead of failing the whole payload.
    list: Vec<serde_json::Value>,
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<Forecast, ForecastError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ForecastError::network(format!("request to OpenWeather failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ForecastError::network(format!("failed to read OpenWeather response: {e}")))?;

        if !status.is_success() {
            return Err(ForecastError::network(format!(
                "OpenWeather returned status {status}: {}",
                truncate_body(&body)
            )));
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ForecastError::network(format!("malformed OpenWeather payload: {e}")))?;

        let mut samples = Vec::with_capacity(parsed.list.len());
        for value in parsed.list {
            match serde_json::from_value::<OwForecastEntry>(value) {
                Ok(entry) => {
                    let Some(weather) = entry.weather.into_iter().next() else {
                        tracing::warn!(dt = entry.dt, "skipping forecast entry without weather");
                        continue;
                    };
                    samples.push(RawSample {
                        timestamp_utc: entry.dt,
                        temperature_c: entry.main.temp,
                        description: weather.description,
                        icon: weather.icon,
                    });
                }
                Err(e) => tracing::warn!(error = %e, "skipping malformed forecast entry"),
            }
        }

        tracing::debug!(
            city = %parsed.city.name,
            samples = samples.len(),
            "fetched OpenWeather forecast"
        );

        Ok(Forecast {
            city_name: parsed.city.name,
            samples,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Cut must land on a char boundary or slicing panics on
        // multibyte bodies.
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_lands_on_char_boundaries() {
        // 3 bytes per char; byte 200 falls inside a character.
        let long = "한".repeat(100);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
        assert!(truncated.trim_end_matches("...").chars().all(|c| c == '한'));
    }
}
