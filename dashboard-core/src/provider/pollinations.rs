use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use super::ImageLoader;

/// Downloads generated images in full before they are shown.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    http: Client,
}

impl HttpImageLoader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn preload(&self, url: &str) -> Result<usize> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to request background image")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Background image request failed with status {status}"));
        }

        let bytes = res.bytes().await.context("Failed to download background image")?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn preload_reads_whole_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prompt/oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
            .mount(&server)
            .await;

        let loader = HttpImageLoader::new(Client::new());
        let size = loader.preload(&format!("{}/prompt/oslo", server.uri())).await.expect("image");

        assert_eq!(size, 4096);
    }

    #[tokio::test]
    async fn preload_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let loader = HttpImageLoader::new(Client::new());
        assert!(loader.preload(&server.uri()).await.is_err());
    }
}
