//! Reverse geocoding through Nominatim (OpenStreetMap). Free, but requires
//! an identifying User-Agent on every request.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;

use crate::model::{Address, Coordinates};

use super::{ReverseGeocoder, truncate_body};

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    url: String,
    user_agent: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), user_agent: user_agent.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: Address,
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coords: Coordinates) -> Result<Address> {
        let res = self
            .http
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Nominatim")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Nominatim response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Nominatim reverse request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: NominatimResponse =
            serde_json::from_str(&body).context("Failed to parse Nominatim JSON")?;

        Ok(parsed.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reverse_sends_user_agent_and_parses_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(header("user-agent", "WeatherApp/1.0"))
            .and(query_param("format", "json"))
            .and(query_param("lat", "47.6062"))
            .and(query_param("lon", "-122.3321"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "display_name": "Seattle, King County, Washington, United States",
                "address": {
                    "city": "Seattle",
                    "county": "King County",
                    "state": "Washington"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let geocoder =
            NominatimGeocoder::new(format!("{}/reverse", server.uri()), "WeatherApp/1.0", Client::new());
        let address = geocoder.reverse(Coordinates::new(47.6062, -122.3321)).await.expect("address");

        assert_eq!(address.city.as_deref(), Some("Seattle"));
        assert_eq!(address.county.as_deref(), Some("King County"));
        assert!(address.town.is_none());
    }

    #[tokio::test]
    async fn missing_address_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "Unable to geocode" })),
            )
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri(), "WeatherApp/1.0", Client::new());
        let address = geocoder.reverse(Coordinates::new(0.0, -30.0)).await.expect("address");

        assert_eq!(address, Address::default());
    }

    #[tokio::test]
    async fn forbidden_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Access blocked"))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri(), "", Client::new());
        let err = geocoder.reverse(Coordinates::new(1.0, 1.0)).await.unwrap_err();

        assert!(err.to_string().contains("status 403"));
    }
}
