//! Error type for surface setup and configuration loading.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum OceanError {
    /// `initialize` was called without a scene container
    MissingScene,
    /// Grid dimensions cannot produce a mesh
    InvalidGrid(String),
    /// Configuration file could not be read
    ConfigIo { path: String, source: io::Error },
    /// Configuration file is not valid JSON for [`crate::params::SurfaceConfig`]
    ConfigParse(serde_json::Error),
}

impl fmt::Display for OceanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScene => write!(f, "no scene container supplied to initialize"),
            Self::InvalidGrid(reason) => write!(f, "invalid surface grid: {}", reason),
            Self::ConfigIo { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            Self::ConfigParse(e) => write!(f, "failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for OceanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}
