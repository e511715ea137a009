//! Ocean surface configuration and partial updates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OceanError;

/// Largest grid whose vertex indices all fit in `u32` ((n + 1)^2 - 1 <= u32::MAX)
pub const MAX_SEGMENTS: u32 = 65_535;

/// Surface configuration read by the animator every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Plane extent along X (world units)
    pub width: f32,

    /// Plane extent along Z (world units)
    pub height: f32,

    /// Quads per side (vertex count is (segments + 1)^2)
    pub segments: u32,

    /// World-space Y of the undisplaced plane
    pub surface_elevation: f32,

    /// Wave height multiplier (world units)
    pub wave_amplitude: f32,

    /// Animation clock rate (dimensionless, scales elapsed time)
    pub wave_speed: f32,

    /// Packed 0xRRGGBB sRGB colour
    pub color: u32,

    /// Material opacity, 0 = invisible, 1 = opaque
    pub opacity: f32,

    /// Draw grid edges instead of filled triangles
    pub wireframe: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            segments: 128,
            surface_elevation: 0.0,
            wave_amplitude: 0.8,
            wave_speed: 1.2,
            color: 0x006994,
            opacity: 0.8,
            wireframe: false,
        }
    }
}

impl SurfaceConfig {
    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OceanError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| OceanError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(OceanError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the grid can actually be built
    pub fn validate(&self) -> Result<(), OceanError> {
        if self.segments == 0 {
            return Err(OceanError::InvalidGrid(
                "segments must be at least 1".to_string(),
            ));
        }
        if self.segments > MAX_SEGMENTS {
            return Err(OceanError::InvalidGrid(format!(
                "segments must be at most {}, got {}",
                MAX_SEGMENTS, self.segments
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(OceanError::InvalidGrid(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(OceanError::InvalidGrid(format!(
                "height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }

    /// Merge the fields present in `patch`; absent fields are left alone
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(color) = patch.color {
            self.color = color & 0x00ff_ffff;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(amplitude) = patch.wave_amplitude {
            self.wave_amplitude = amplitude;
        }
        if let Some(speed) = patch.wave_speed {
            self.wave_speed = speed;
        }
        if let Some(wireframe) = patch.wireframe {
            self.wireframe = wireframe;
        }
    }
}

/// Partial update of the runtime-adjustable surface properties
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigPatch {
    pub color: Option<u32>,
    pub opacity: Option<f32>,
    pub wave_amplitude: Option<f32>,
    pub wave_speed: Option<f32>,
    pub wireframe: Option<bool>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_wave_amplitude(mut self, amplitude: f32) -> Self {
        self.wave_amplitude = Some(amplitude);
        self
    }

    pub fn with_wave_speed(mut self, speed: f32) -> Self {
        self.wave_speed = Some(speed);
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = Some(wireframe);
        self
    }
}

/// Convert a packed 0xRRGGBB sRGB colour to linear RGB
pub fn rgb_to_linear(color: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}
