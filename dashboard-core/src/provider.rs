use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    error::DashboardError,
    model::{Address, Coordinates, ResolvedPlace, SearchQuery, WeatherSnapshot},
};

pub mod nominatim;
pub mod openmeteo;
pub mod pollinations;

pub use nominatim::NominatimGeocoder;
pub use openmeteo::{OpenMeteoGeocoder, OpenMeteoProvider};
pub use pollinations::HttpImageLoader;

/// Current conditions for a coordinate, including its IANA timezone.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, coords: Coordinates) -> Result<WeatherSnapshot, DashboardError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn reverse(&self, coords: Coordinates) -> anyhow::Result<Address>;
}

/// Place search. `Ok(None)` means the search ran and matched nothing.
#[async_trait]
pub trait ForwardGeocoder: Send + Sync + Debug {
    async fn search(&self, query: &SearchQuery) -> anyhow::Result<Option<ResolvedPlace>>;
}

/// Fetches an image completely; returns the number of bytes received.
#[async_trait]
pub trait ImageLoader: Send + Sync + Debug {
    async fn preload(&self, url: &str) -> anyhow::Result<usize>;
}

/// Shared HTTP client. No request timeout: a hung call just never completes.
pub fn http_client(user_agent: &str) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
