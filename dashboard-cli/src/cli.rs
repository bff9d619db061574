use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Collaborators, Config, Coordinates, Dashboard, Screen, SearchOutcome, StaticGeolocation,
};
use inquire::{Confirm, CustomType, Text};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{self, TerminalRenderer};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Live weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the live dashboard; each line typed on stdin is a location search.
    Run {
        /// Device latitude; overrides the configured home position.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Device longitude; overrides the configured home position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Behave as if location access was refused.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        deny_location: bool,
    },

    /// Search for a location once and print the dashboard.
    Show {
        /// Place name to search for.
        query: String,
    },

    /// Set the home position, user agent and image size.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Run { lat, lon, deny_location } => {
                let config = Config::load()?;
                let geolocation = if deny_location {
                    StaticGeolocation::Denied
                } else {
                    let flags = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                    StaticGeolocation::from_option(flags.or(config.home))
                };
                run_live(&config, geolocation).await
            }
            Command::Show { query } => show_once(&Config::load()?, &query).await,
            Command::Configure => configure(),
        }
    }
}

async fn run_live(config: &Config, geolocation: StaticGeolocation) -> Result<()> {
    let screen = Screen::new(Arc::new(TerminalRenderer::default()));
    let collaborators = Collaborators::http(config, Arc::new(geolocation))?;
    let dashboard = Dashboard::new(config, collaborators, screen);

    tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.start().await }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read search input")? else {
                    break;
                };
                match line.trim() {
                    "/quit" => break,
                    "/dismiss" => dashboard.dismiss_notice(),
                    _ => {
                        // Searches may overlap; stale results are dropped by the dashboard.
                        let dashboard = dashboard.clone();
                        tokio::spawn(async move {
                            if let SearchOutcome::Failed(err) = dashboard.search(&line).await {
                                tracing::info!("Search '{}' failed: {}", line.trim(), err);
                            }
                        });
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

async fn show_once(config: &Config, query: &str) -> Result<()> {
    let collaborators = Collaborators::http(config, Arc::new(StaticGeolocation::Unsupported))?;
    let dashboard = Dashboard::new(config, collaborators, Screen::headless());
    dashboard.show_date();

    match dashboard.search(query).await {
        SearchOutcome::Ignored => bail!("Search query must not be empty"),
        SearchOutcome::Failed(err) => bail!("{err}"),
        SearchOutcome::Resolved(_) => {
            print!("{}", render::frame(&dashboard.screen().snapshot()));
            Ok(())
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let set_home = Confirm::new("Use a fixed home position as the device location?")
        .with_default(config.home.is_some())
        .prompt()?;

    config.home = if set_home {
        let current = config.home.unwrap_or(Coordinates::new(0.0, 0.0));
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_default(current.latitude)
            .with_error_message("Please enter a number, e.g. 52.52")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_default(current.longitude)
            .with_error_message("Please enter a number, e.g. 13.41")
            .prompt()?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    };

    config.user_agent = Text::new("User-Agent sent to map and geocoding services:")
        .with_default(&config.user_agent)
        .prompt()?;

    config.viewport.width = CustomType::<u32>::new("Background image width (px):")
        .with_default(config.viewport.width)
        .prompt()?;
    config.viewport.height = CustomType::<u32>::new("Background image height (px):")
        .with_default(config.viewport.height)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
