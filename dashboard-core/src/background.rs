//! Scenic background for the place on screen.
//!
//! The image is fetched in full before it replaces the current background,
//! so a slow or failed load just leaves the old one in place.

use std::sync::Arc;
use url::Url;

use crate::{
    config::Viewport,
    model::UNKNOWN_LOCATION,
    provider::ImageLoader,
    view::{Generation, Screen},
};

#[derive(Debug, Clone)]
pub struct BackgroundRenderer {
    base_url: String,
    viewport: Viewport,
    loader: Arc<dyn ImageLoader>,
    screen: Screen,
}

impl BackgroundRenderer {
    pub fn new(
        base_url: impl Into<String>,
        viewport: Viewport,
        loader: Arc<dyn ImageLoader>,
        screen: Screen,
    ) -> Self {
        Self { base_url: base_url.into(), viewport, loader, screen }
    }

    /// Image URL for `place`, or `None` when the base URL is unusable.
    pub fn image_url(&self, place: &str) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        let prompt = format!("scenic view skyline of {place} city landmark wallpaper");
        url.path_segments_mut().ok()?.pop_if_empty().push(&prompt);
        url.query_pairs_mut()
            .append_pair("width", &self.viewport.width.to_string())
            .append_pair("height", &self.viewport.height.to_string())
            .append_pair("nologo", "true");
        Some(url)
    }

    /// Load the image for `place` and show it if `generation` is still current.
    pub async fn render(&self, place: &str, generation: Generation) {
        if place.is_empty() || place == UNKNOWN_LOCATION {
            return;
        }

        let Some(url) = self.image_url(place) else {
            tracing::warn!("Invalid background image base URL: {}", self.base_url);
            return;
        };

        match self.loader.preload(url.as_str()).await {
            Ok(bytes) => {
                let swapped = self
                    .screen
                    .update_if_current(generation, |view| view.background = Some(url.to_string()));
                if swapped {
                    tracing::debug!("Background for '{}' loaded ({} bytes)", place, bytes);
                } else {
                    tracing::debug!("Dropping background for '{}': superseded", place);
                }
            }
            Err(e) => tracing::debug!("Background for '{}' not loaded: {:#}", place, e),
        }
    }
}
