use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::GeolocationError, model::Coordinates};

/// Where the dashboard learns the device position on start.
#[async_trait]
pub trait GeolocationSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A position known up front, e.g. from flags or the config file.
#[derive(Debug, Clone)]
pub enum StaticGeolocation {
    Fixed(Coordinates),
    Denied,
    Unsupported,
}

impl StaticGeolocation {
    /// `Unsupported` when no position is configured.
    pub fn from_option(coords: Option<Coordinates>) -> Self {
        coords.map_or(Self::Unsupported, Self::Fixed)
    }
}

#[async_trait]
impl GeolocationSource for StaticGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            StaticGeolocation::Fixed(coords) => Ok(*coords),
            StaticGeolocation::Denied => Err(GeolocationError::Denied),
            StaticGeolocation::Unsupported => Err(GeolocationError::Unsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_position_is_unsupported() {
        let source = StaticGeolocation::from_option(None);
        assert_eq!(source.current_position().await, Err(GeolocationError::Unsupported));
    }

    #[tokio::test]
    async fn fixed_position_is_reported() {
        let here = Coordinates::new(40.4168, -3.7038);
        let source = StaticGeolocation::from_option(Some(here));
        assert_eq!(source.current_position().await, Ok(here));
    }
}
