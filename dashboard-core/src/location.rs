//! Forward and reverse geocoding on top of the provider traits.

use std::sync::Arc;

use crate::{
    error::DashboardError,
    model::{Address, Coordinates, ResolvedPlace, SearchQuery, UNKNOWN_LOCATION},
    provider::{ForwardGeocoder, ReverseGeocoder},
};

/// Pick the most specific place name: city, town, village, suburb, county,
/// then the unknown-location sentinel.
pub fn place_name(address: &Address) -> String {
    [
        &address.city,
        &address.town,
        &address.village,
        &address.suburb,
        &address.county,
    ]
    .into_iter()
    .flatten()
    .map(|s| s.trim())
    .find(|s| !s.is_empty())
    .unwrap_or(UNKNOWN_LOCATION)
    .to_string()
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    reverse: Arc<dyn ReverseGeocoder>,
    forward: Arc<dyn ForwardGeocoder>,
}

impl LocationResolver {
    pub fn new(reverse: Arc<dyn ReverseGeocoder>, forward: Arc<dyn ForwardGeocoder>) -> Self {
        Self { reverse, forward }
    }

    /// Never fails; degrades to [`UNKNOWN_LOCATION`] and logs the cause.
    pub async fn reverse_geocode(&self, coords: Coordinates) -> String {
        match self.reverse.reverse(coords).await {
            Ok(address) => {
                let name = place_name(&address);
                tracing::info!("Reverse geocoded {} to: {}", coords, name);
                name
            }
            Err(e) => {
                let err = DashboardError::ReverseGeocodeFailed(format!("{e:#}"));
                tracing::warn!("{}", err);
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    pub async fn forward_geocode(&self, query: &SearchQuery) -> Result<ResolvedPlace, DashboardError> {
        match self.forward.search(query).await {
            Ok(Some(place)) => {
                tracing::info!("Resolved '{}' to {} ({})", query.as_str(), place.display_name(), place.coords);
                Ok(place)
            }
            Ok(None) => Err(DashboardError::LocationNotFound),
            Err(e) => {
                tracing::warn!("Search for '{}' failed: {:#}", query.as_str(), e);
                Err(DashboardError::GeocodeLookupFailed { reason: format!("{e:#}") })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedReverse(Option<Address>);

    #[async_trait]
    impl ReverseGeocoder for FixedReverse {
        async fn reverse(&self, _coords: Coordinates) -> anyhow::Result<Address> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("network down"))
        }
    }

    #[derive(Debug)]
    enum FixedSearch {
        Hit(ResolvedPlace),
        Miss,
        Broken,
    }

    #[async_trait]
    impl ForwardGeocoder for FixedSearch {
        async fn search(&self, _query: &SearchQuery) -> anyhow::Result<Option<ResolvedPlace>> {
            match self {
                FixedSearch::Hit(place) => Ok(Some(place.clone())),
                FixedSearch::Miss => Ok(None),
                FixedSearch::Broken => Err(anyhow::anyhow!("bad gateway")),
            }
        }
    }

    fn resolver(reverse: Option<Address>, search: FixedSearch) -> LocationResolver {
        LocationResolver::new(Arc::new(FixedReverse(reverse)), Arc::new(search))
    }

    #[test]
    fn place_name_follows_fallback_order() {
        let mut address = Address {
            city: None,
            town: Some("Hallstatt".into()),
            village: Some("Lahn".into()),
            suburb: None,
            county: Some("Gmunden".into()),
        };
        assert_eq!(place_name(&address), "Hallstatt");

        address.town = Some(String::new());
        assert_eq!(place_name(&address), "Lahn");

        address.village = None;
        assert_eq!(place_name(&address), "Gmunden");

        address.suburb = Some("Obertraun".into());
        assert_eq!(place_name(&address), "Obertraun");

        address.city = Some("Salzburg".into());
        assert_eq!(place_name(&address), "Salzburg");
    }

    #[test]
    fn empty_address_is_unknown_location() {
        assert_eq!(place_name(&Address::default()), UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn reverse_failure_degrades_to_sentinel() {
        let r = resolver(None, FixedSearch::Miss);
        assert_eq!(r.reverse_geocode(Coordinates::new(1.0, 2.0)).await, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn forward_maps_outcomes_to_errors() {
        let query = SearchQuery::parse("Lima").expect("query");
        let lima = ResolvedPlace {
            coords: Coordinates::new(-12.04, -77.03),
            name: "Lima".into(),
            country: Some("Peru".into()),
        };

        let hit = resolver(None, FixedSearch::Hit(lima.clone())).forward_geocode(&query).await;
        assert_eq!(hit, Ok(lima));

        let miss = resolver(None, FixedSearch::Miss).forward_geocode(&query).await;
        assert_eq!(miss, Err(DashboardError::LocationNotFound));

        let broken = resolver(None, FixedSearch::Broken).forward_geocode(&query).await;
        assert!(matches!(
            broken,
            Err(DashboardError::GeocodeLookupFailed { ref reason }) if reason.contains("bad gateway")
        ));
    }
}
