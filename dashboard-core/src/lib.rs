//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Shared domain models (coordinates, weather snapshots, places)
//! - Collaborator traits and their HTTP implementations
//! - The clock, map and background services that write to the screen
//! - The dashboard controller that sequences all of the above
//!
//! It is used by `dashboard-cli`, but any host that can render a
//! [`DashboardView`] and supply a position can drive it.

pub mod background;
pub mod clock;
pub mod codes;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geolocation;
pub mod location;
pub mod map;
pub mod model;
pub mod provider;
pub mod view;

pub use codes::{ConditionDescriptor, describe};
pub use config::Config;
pub use dashboard::{Collaborators, Dashboard, SearchOutcome};
pub use error::{DashboardError, GeolocationError, Surface};
pub use geolocation::{GeolocationSource, StaticGeolocation};
pub use model::{Coordinates, ResolvedPlace, SearchQuery, UNKNOWN_LOCATION, WeatherSnapshot};
pub use view::{DashboardView, Phase, Renderer, Screen};
