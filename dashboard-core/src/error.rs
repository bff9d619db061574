use thiserror::Error;

/// Why the host could not supply a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location access denied. Please enable permissions.")]
    Denied,
    #[error("Geolocation is not supported by this browser.")]
    Unsupported,
}

/// Where a failure shows up on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Persistent error banner.
    Banner,
    /// Transient, dismissable notice; prior state is left alone.
    Notice,
    /// Logged only.
    Silent,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("{0}")]
    PermissionDenied(#[from] GeolocationError),

    #[error("{0}")]
    WeatherUnavailable(String),

    #[error("Location not found")]
    LocationNotFound,

    #[error("An error occurred while searching.")]
    GeocodeLookupFailed { reason: String },

    #[error("Reverse geocoding failed: {0}")]
    ReverseGeocodeFailed(String),
}

impl DashboardError {
    pub fn surface(&self) -> Surface {
        match self {
            DashboardError::PermissionDenied(_) | DashboardError::WeatherUnavailable(_) => {
                Surface::Banner
            }
            DashboardError::LocationNotFound | DashboardError::GeocodeLookupFailed { .. } => {
                Surface::Notice
            }
            DashboardError::ReverseGeocodeFailed(_) => Surface::Silent,
        }
    }
}
