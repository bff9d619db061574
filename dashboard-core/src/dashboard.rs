//! The dashboard controller: turns triggers into collaborator calls and
//! collaborator results into screen updates.
//!
//! Calls without a data dependency run concurrently and each one writes its
//! own slice of the view as soon as it completes. Every trigger that
//! resolves coordinates starts a new request generation on the [`Screen`],
//! and completions from an older generation are dropped.

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    background::BackgroundRenderer,
    clock::{ClockHandle, ClockService},
    codes,
    config::Config,
    error::{DashboardError, Surface},
    geolocation::GeolocationSource,
    location::LocationResolver,
    map::MapView,
    model::{Coordinates, ResolvedPlace, SearchQuery, WeatherSnapshot},
    provider::{
        ForwardGeocoder, HttpImageLoader, ImageLoader, NominatimGeocoder, OpenMeteoGeocoder,
        OpenMeteoProvider, ReverseGeocoder, WeatherProvider, http_client,
    },
    view::{Generation, Phase, Screen},
};

const ERROR_LOCATION: &str = "Error";
const OFFLINE_CONDITION: &str = "Offline";
const ERROR_ICON: &str = "⚠️";

/// The external services the dashboard talks to.
#[derive(Debug, Clone)]
pub struct Collaborators {
    pub geolocation: Arc<dyn GeolocationSource>,
    pub weather: Arc<dyn WeatherProvider>,
    pub reverse: Arc<dyn ReverseGeocoder>,
    pub forward: Arc<dyn ForwardGeocoder>,
    pub images: Arc<dyn ImageLoader>,
}

impl Collaborators {
    /// HTTP-backed collaborators for the endpoints in `config`.
    pub fn http(config: &Config, geolocation: Arc<dyn GeolocationSource>) -> anyhow::Result<Self> {
        let http = http_client(&config.user_agent)?;
        let endpoints = &config.endpoints;

        Ok(Self {
            geolocation,
            weather: Arc::new(OpenMeteoProvider::new(&endpoints.weather_url, http.clone())),
            reverse: Arc::new(NominatimGeocoder::new(
                &endpoints.reverse_geocode_url,
                &config.user_agent,
                http.clone(),
            )),
            forward: Arc::new(OpenMeteoGeocoder::new(&endpoints.forward_geocode_url, http.clone())),
            images: Arc::new(HttpImageLoader::new(http)),
        })
    }
}

/// What a search submission led to.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank input; nothing was requested or changed.
    Ignored,
    Resolved(ResolvedPlace),
    /// Shown as a notice; the rest of the dashboard is untouched.
    Failed(DashboardError),
}

#[derive(Debug)]
struct Inner {
    screen: Screen,
    geolocation: Arc<dyn GeolocationSource>,
    weather: Arc<dyn WeatherProvider>,
    locations: LocationResolver,
    map: MapView,
    background: BackgroundRenderer,
    clocks: ClockService,
    /// The one live clock. Only the controller replaces it.
    clock: Mutex<Option<ClockHandle>>,
}

/// Cheap to clone; clones drive the same dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl Dashboard {
    pub fn new(config: &Config, collaborators: Collaborators, screen: Screen) -> Self {
        let Collaborators { geolocation, weather, reverse, forward, images } = collaborators;

        Self {
            inner: Arc::new(Inner {
                geolocation,
                weather,
                locations: LocationResolver::new(reverse, forward),
                map: MapView::new(screen.clone(), &config.endpoints.tile_url_template, &config.map),
                background: BackgroundRenderer::new(
                    &config.endpoints.image_url,
                    config.viewport,
                    images,
                    screen.clone(),
                ),
                clocks: ClockService::new(screen.clone()),
                clock: Mutex::new(None),
                screen,
            }),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.inner.screen
    }

    /// Timezone of the running clock, if any.
    pub fn active_timezone(&self) -> Option<String> {
        self.inner.clock.lock().as_ref().map(|h| h.timezone().to_string())
    }

    /// Write today's date into the header.
    pub fn show_date(&self) {
        let today = format_date(Local::now().date_naive());
        self.inner.screen.update(|v| v.date = today);
    }

    /// App start: show today's date and load the device position.
    pub async fn start(&self) {
        self.show_date();
        let screen = &self.inner.screen;
        screen.update(|v| v.phase = Phase::Resolving);

        let generation = screen.begin_request();
        let position = self.inner.geolocation.current_position().await;
        if !screen.is_current(generation) {
            tracing::debug!("Dropping device position: a search landed first");
            return;
        }
        match position {
            Ok(coords) => self.show_position(coords, generation).await,
            Err(e) => self.report(generation, &DashboardError::from(e)),
        }
    }

    /// Search submission. Blank input is ignored without touching anything.
    pub async fn search(&self, input: &str) -> SearchOutcome {
        let Some(query) = SearchQuery::parse(input) else {
            return SearchOutcome::Ignored;
        };
        let screen = &self.inner.screen;
        screen.update(|v| v.notice = None);

        let place = match self.inner.locations.forward_geocode(&query).await {
            Ok(place) => place,
            Err(err) => {
                self.report(screen.current_generation(), &err);
                return SearchOutcome::Failed(err);
            }
        };

        let generation = screen.begin_request();
        let display_name = place.display_name();
        screen.update_if_current(generation, |v| {
            v.location = display_name;
            v.location_resolved = true;
            v.error_banner = None;
            v.phase = Phase::Resolving;
        });

        self.inner.map.show(place.coords, generation);
        tokio::join!(
            self.inner.background.render(&place.name, generation),
            self.load_weather(place.coords, generation),
        );

        SearchOutcome::Resolved(place)
    }

    pub fn dismiss_notice(&self) {
        self.inner.screen.update(|v| v.notice = None);
    }

    async fn show_position(&self, coords: Coordinates, generation: Generation) {
        self.inner.map.show(coords, generation);

        let place = async {
            let name = self.inner.locations.reverse_geocode(coords).await;
            let shown = self.inner.screen.update_if_current(generation, |v| {
                v.location = name.clone();
                v.location_resolved = true;
            });
            if shown {
                self.inner.background.render(&name, generation).await;
            } else {
                tracing::debug!("Dropping place name '{}': superseded", name);
            }
        };

        tokio::join!(self.load_weather(coords, generation), place);
    }

    async fn load_weather(&self, coords: Coordinates, generation: Generation) {
        match self.inner.weather.current_weather(coords).await {
            Ok(snapshot) => self.apply_weather(generation, &snapshot),
            Err(err) => self.report(generation, &err),
        }
    }

    fn apply_weather(&self, generation: Generation, snapshot: &WeatherSnapshot) {
        let condition = codes::describe(snapshot.condition_code);
        let (day_night_icon, day_night_title) =
            if snapshot.is_day { ("☀️", "Day") } else { ("🌙", "Night") };

        let applied = self.inner.screen.update_if_current(generation, |v| {
            v.temperature = format_temperature(snapshot.temperature_c);
            v.wind = format!("{} km/h", snapshot.wind_speed_kph);
            v.elevation = format!("{} m", snapshot.elevation_m);
            v.condition = condition.label.to_string();
            v.icon = condition.icon(snapshot.is_day).to_string();
            v.day_night_icon = day_night_icon.to_string();
            v.day_night_title = day_night_title.to_string();
            v.error_banner = None;
            v.phase = Phase::Ready;
        });

        if applied {
            self.restart_clock(generation, &snapshot.timezone);
        } else {
            tracing::debug!("Dropping weather for {}: superseded", snapshot.timezone);
        }
    }

    /// Replace the running clock. The old one is cancelled before the new one renders.
    fn restart_clock(&self, generation: Generation, timezone: &str) {
        let mut slot = self.inner.clock.lock();
        // A newer request may have landed since the weather was applied.
        if !self.inner.screen.is_current(generation) {
            return;
        }
        if let Some(previous) = slot.take() {
            self.inner.clocks.cancel(previous);
        }
        *slot = Some(self.inner.clocks.start(timezone));
    }

    fn report(&self, generation: Generation, err: &DashboardError) {
        match err.surface() {
            Surface::Banner => self.show_failure(generation, err),
            Surface::Notice => self.inner.screen.update(|v| v.notice = Some(err.to_string())),
            Surface::Silent => tracing::debug!("{}", err),
        }
    }

    /// Banner-class failure. Leaves the clock running and keeps a resolved name.
    fn show_failure(&self, generation: Generation, err: &DashboardError) {
        tracing::warn!("Dashboard error: {}", err);
        let message = err.to_string();

        let applied = self.inner.screen.update_if_current(generation, |v| {
            if !v.location_resolved {
                v.location = ERROR_LOCATION.to_string();
            }
            v.condition = OFFLINE_CONDITION.to_string();
            v.icon = ERROR_ICON.to_string();
            v.error_banner = Some(message);
            v.phase = Phase::Error;
        });

        if !applied {
            tracing::debug!("Dropping error '{}': superseded", err);
        }
    }
}

/// Whole degrees, rounding halves up like the browser does: 21.5 -> 22, -2.5 -> -2.
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°", (celsius + 0.5).floor() as i64)
}

/// e.g. "Friday, October 16, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_rounds_half_up() {
        assert_eq!(format_temperature(21.4), "21°");
        assert_eq!(format_temperature(21.5), "22°");
        assert_eq!(format_temperature(-2.5), "-2°");
        assert_eq!(format_temperature(-2.6), "-3°");
        assert_eq!(format_temperature(-0.2), "0°");
    }

    #[test]
    fn date_is_long_us_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).expect("valid date");
        assert_eq!(format_date(date), "Thursday, March 5, 2026");
    }
}
