use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Coordinates;

/// Collaborator endpoints. Overridable so tests and mirrors can point elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather_url: String,
    pub reverse_geocode_url: String,
    pub forward_geocode_url: String,
    /// Prompt is appended as a path segment.
    pub image_url: String,
    /// Raster tile template with `{s}`, `{z}`, `{x}`, `{y}` and `{r}` placeholders.
    pub tile_url_template: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_url: "https://api.open-meteo.com/v1/forecast".into(),
            reverse_geocode_url: "https://nominatim.openstreetmap.org/reverse".into(),
            forward_geocode_url: "https://geocoding-api.open-meteo.com/v1/search".into(),
            image_url: "https://image.pollinations.ai/prompt/".into(),
            tile_url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png"
                .into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub zoom: u8,
    pub max_zoom: u8,
    pub subdomains: String,
    pub attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: 13,
            max_zoom: 19,
            subdomains: "abcd".into(),
            attribution: "© OpenStreetMap contributors © CARTO".into(),
        }
    }
}

/// Pixel size requested for generated background images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// user_agent = "WeatherApp/1.0"
///
/// [home]
/// latitude = 52.52
/// longitude = 13.41
///
/// [map]
/// zoom = 11
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sent to every collaborator; Nominatim rejects requests without one.
    pub user_agent: String,

    /// Position reported as the device location, if any.
    pub home: Option<Coordinates>,

    pub endpoints: Endpoints,
    pub map: MapSettings,
    pub viewport: Viewport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: "WeatherApp/1.0".into(),
            home: None,
            endpoints: Endpoints::default(),
            map: MapSettings::default(),
            viewport: Viewport::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
