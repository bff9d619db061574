use serde::{Deserialize, Serialize};

/// Place name used whenever reverse geocoding yields nothing usable.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions for one location, replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub wind_speed_kph: f64,
    pub condition_code: i32,
    pub is_day: bool,
    pub elevation_m: f64,
    /// IANA timezone id, e.g. "Europe/Berlin".
    pub timezone: String,
}

/// Address parts a reverse geocoder may report; any of them can be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub county: Option<String>,
}

/// A forward-geocoded search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub coords: Coordinates,
    pub name: String,
    pub country: Option<String>,
}

impl ResolvedPlace {
    /// "Name, Country", or just the name when the hit has no country.
    pub fn display_name(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Non-empty, trimmed search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_rejects_blank_input() {
        assert!(SearchQuery::parse("").is_none());
        assert!(SearchQuery::parse("   \t\n").is_none());
    }

    #[test]
    fn search_query_trims() {
        let q = SearchQuery::parse("  Oslo ").expect("non-empty query");
        assert_eq!(q.as_str(), "Oslo");
    }

    #[test]
    fn display_name_includes_country_when_present() {
        let mut place = ResolvedPlace {
            coords: Coordinates::new(59.91, 10.75),
            name: "Oslo".into(),
            country: Some("Norway".into()),
        };
        assert_eq!(place.display_name(), "Oslo, Norway");

        place.country = None;
        assert_eq!(place.display_name(), "Oslo");

        place.country = Some(String::new());
        assert_eq!(place.display_name(), "Oslo");
    }
}
