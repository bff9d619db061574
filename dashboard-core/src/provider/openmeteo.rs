use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::DashboardError,
    model::{Coordinates, ResolvedPlace, SearchQuery, WeatherSnapshot},
};

use super::{ForwardGeocoder, WeatherProvider, truncate_body};

const UNAVAILABLE: &str = "Weather data not available";

/// Open-Meteo forecast API, current conditions only.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: OmCurrentWeather,
    elevation: f64,
    timezone: String,
}

impl From<OmForecastResponse> for WeatherSnapshot {
    fn from(parsed: OmForecastResponse) -> Self {
        Self {
            temperature_c: parsed.current_weather.temperature,
            wind_speed_kph: parsed.current_weather.windspeed,
            condition_code: parsed.current_weather.weathercode,
            is_day: parsed.current_weather.is_day == 1,
            elevation_m: parsed.elevation,
            timezone: parsed.timezone,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherSnapshot, DashboardError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("elevation", "nan".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| DashboardError::WeatherUnavailable(format!("{UNAVAILABLE}: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            tracing::debug!("Open-Meteo forecast request failed with status {}", status);
            return Err(DashboardError::WeatherUnavailable(UNAVAILABLE.to_string()));
        }

        let body = res
            .text()
            .await
            .map_err(|e| DashboardError::WeatherUnavailable(format!("{UNAVAILABLE}: {e}")))?;

        let parsed: OmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Malformed Open-Meteo payload: {}", truncate_body(&body));
            DashboardError::WeatherUnavailable(format!("{UNAVAILABLE}: malformed response ({e})"))
        })?;

        Ok(parsed.into())
    }
}

/// Open-Meteo geocoding API; returns the single best match.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    #[serde(default)]
    results: Vec<OmSearchResult>,
}

#[async_trait]
impl ForwardGeocoder for OpenMeteoGeocoder {
    async fn search(&self, query: &SearchQuery) -> Result<Option<ResolvedPlace>> {
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("name", query.as_str()),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo geocoding")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmSearchResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        Ok(parsed.results.into_iter().next().map(|hit| ResolvedPlace {
            coords: Coordinates::new(hit.latitude, hit.longitude),
            name: hit.name,
            country: hit.country,
        }))
    }
}
