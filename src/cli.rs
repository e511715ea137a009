//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::error::OceanError;
use crate::params::{SurfaceConfig, WeatherPreset};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "tidewave")]
#[command(about = "Animated procedural ocean surface", long_about = None)]
pub struct Args {
    /// JSON surface configuration (missing fields use defaults)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Weather preset applied at startup: calm, choppy, stormy, default
    #[arg(long, value_name = "PRESET")]
    pub weather: Option<String>,

    /// Start in wireframe mode
    #[arg(long)]
    pub wireframe: bool,

    /// Override the grid segment count
    #[arg(long, value_name = "N")]
    pub segments: Option<u32>,

    /// Simulate this many frames at 60 Hz without opening a window
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u32>,
}

impl Args {
    /// Build the surface configuration from the config file and overrides
    pub fn surface_config(&self) -> Result<SurfaceConfig, OceanError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading surface config from {}", path.display());
                SurfaceConfig::from_json_file(path)?
            }
            None => SurfaceConfig::default(),
        };
        if let Some(segments) = self.segments {
            config.segments = segments;
        }
        if self.wireframe {
            config.wireframe = true;
        }
        config.validate()?;
        Ok(config)
    }

    /// Startup weather, if one was requested
    pub fn weather_preset(&self) -> Option<WeatherPreset> {
        self.weather.as_deref().map(WeatherPreset::from_name)
    }
}
