//! One map, one marker, for the dashboard's whole lifetime.

use std::{f64::consts::PI, time::Duration};

use crate::{
    config::MapSettings,
    model::Coordinates,
    view::{Generation, Screen},
};

/// Delay before the one-off layout recalculation after the map is created.
pub const INVALIDATE_DELAY: Duration = Duration::from_millis(100);

const FIRST_POPUP: &str = "You are here";
const MOVED_POPUP: &str = "Location";

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub subdomains: String,
    pub max_zoom: u8,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinates,
    pub popup: String,
    pub popup_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub center: Coordinates,
    pub zoom: u8,
    pub marker: Marker,
    pub tile_layer: TileLayer,
    /// Forced layout recalculations so far.
    pub size_invalidations: u32,
}

impl MapState {
    /// Slippy-map tile (x, y) containing the center at the current zoom.
    pub fn center_tile(&self) -> (u32, u32) {
        let n = f64::from(1u32 << self.zoom.min(30));
        let lat = self.center.latitude.clamp(-85.051_128_78, 85.051_128_78).to_radians();
        let x = ((self.center.longitude + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
        let max = n - 1.0;
        (x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
    }

    /// URL of the tile under the center, with the template fully expanded.
    pub fn center_tile_url(&self) -> String {
        let (x, y) = self.center_tile();
        let subdomains: Vec<char> = self.tile_layer.subdomains.chars().collect();
        let s = if subdomains.is_empty() {
            String::new()
        } else {
            subdomains[(x as usize + y as usize) % subdomains.len()].to_string()
        };

        self.tile_layer
            .url_template
            .replace("{s}", &s)
            .replace("{z}", &self.zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{r}", "")
    }

    fn invalidate_size(&mut self) {
        self.size_invalidations += 1;
    }
}

#[derive(Debug, Clone)]
pub struct MapView {
    screen: Screen,
    tile_layer: TileLayer,
    zoom: u8,
}

impl MapView {
    pub fn new(screen: Screen, url_template: &str, settings: &MapSettings) -> Self {
        Self {
            screen,
            tile_layer: TileLayer {
                url_template: url_template.to_string(),
                subdomains: settings.subdomains.clone(),
                max_zoom: settings.max_zoom,
                attribution: settings.attribution.clone(),
            },
            zoom: settings.zoom.min(settings.max_zoom),
        }
    }

    /// Create the map on first use, otherwise re-center it and move the marker.
    /// Does nothing once `generation` has been superseded; returns whether it moved.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, coords: Coordinates, generation: Generation) -> bool {
        let mut created = false;
        let shown = self.screen.update_if_current(generation, |view| match &mut view.map {
            Some(map) => {
                map.center = coords;
                map.zoom = self.zoom;
                map.marker.position = coords;
                map.marker.popup = MOVED_POPUP.into();
                map.marker.popup_open = true;
            }
            None => {
                view.map = Some(MapState {
                    center: coords,
                    zoom: self.zoom,
                    marker: Marker {
                        position: coords,
                        popup: FIRST_POPUP.into(),
                        popup_open: true,
                    },
                    tile_layer: self.tile_layer.clone(),
                    size_invalidations: 0,
                });
                created = true;
            }
        });

        if created {
            let screen = self.screen.clone();
            tokio::spawn(async move {
                tokio::time::sleep(INVALIDATE_DELAY).await;
                screen.update(|view| {
                    if let Some(map) = &mut view.map {
                        map.invalidate_size();
                    }
                });
            });
        }

        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_view(screen: &Screen) -> MapView {
        MapView::new(
            screen.clone(),
            "https://{s}.tiles.test/{z}/{x}/{y}{r}.png",
            &MapSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn first_show_creates_map_and_invalidates_once() {
        let screen = Screen::headless();
        let view = map_view(&screen);

        assert!(view.show(Coordinates::new(48.8566, 2.3522), screen.begin_request()));
        let map = screen.snapshot().map.expect("map created");
        assert_eq!(map.zoom, 13);
        assert_eq!(map.marker.popup, "You are here");
        assert!(map.marker.popup_open);
        assert_eq!(map.size_invalidations, 0);

        tokio::time::sleep(INVALIDATE_DELAY * 2).await;
        assert_eq!(screen.snapshot().map.expect("map").size_invalidations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn later_shows_reposition_in_place() {
        let screen = Screen::headless();
        let view = map_view(&screen);

        view.show(Coordinates::new(48.8566, 2.3522), screen.begin_request());
        tokio::time::sleep(INVALIDATE_DELAY * 2).await;

        let tokyo = Coordinates::new(35.6762, 139.6503);
        view.show(tokyo, screen.begin_request());
        tokio::time::sleep(INVALIDATE_DELAY * 2).await;

        let map = screen.snapshot().map.expect("map");
        assert_eq!(map.center, tokyo);
        assert_eq!(map.marker.position, tokyo);
        assert_eq!(map.marker.popup, "Location");
        assert_eq!(map.size_invalidations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_show_leaves_map_alone() {
        let screen = Screen::headless();
        let view = map_view(&screen);

        let stale = screen.begin_request();
        let current = screen.begin_request();
        let oslo = Coordinates::new(59.9127, 10.7461);
        assert!(view.show(oslo, current));
        assert!(!view.show(Coordinates::new(47.6, -122.3), stale));

        let map = screen.snapshot().map.expect("map");
        assert_eq!(map.center, oslo);
        assert_eq!(map.marker.position, oslo);
    }

    #[tokio::test]
    async fn center_tile_url_expands_template() {
        let screen = Screen::headless();
        map_view(&screen).show(Coordinates::new(0.0, 0.0), screen.current_generation());

        let map = screen.snapshot().map.expect("map");
        // 2^13 / 2 in both axes; (4096 + 4096) % 4 == 0 -> "a".
        assert_eq!(map.center_tile(), (4096, 4096));
        assert_eq!(map.center_tile_url(), "https://a.tiles.test/13/4096/4096.png");
    }

    #[test]
    fn center_tile_matches_known_tile() {
        let map = MapState {
            center: Coordinates::new(51.5074, -0.1278),
            zoom: 10,
            marker: Marker {
                position: Coordinates::new(51.5074, -0.1278),
                popup: String::new(),
                popup_open: false,
            },
            tile_layer: TileLayer {
                url_template: "{z}/{x}/{y}".into(),
                subdomains: String::new(),
                max_zoom: 19,
                attribution: String::new(),
            },
            size_invalidations: 0,
        };

        assert_eq!(map.center_tile(), (511, 340));
        assert_eq!(map.center_tile_url(), "10/511/340");
    }
}
