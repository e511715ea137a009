//! Parameter definitions with units and documented semantics.
//!
//! Every tunable value lives here:
//! - Surface geometry and appearance (runtime adjustable)
//! - Weather presets (bulk adjustments)
//! - Viewer window and camera settings

mod render;
mod surface;
mod weather;

// Re-export all types
pub use render::{RenderConfig, ViewCamera};
pub use surface::{rgb_to_linear, ConfigPatch, SurfaceConfig, MAX_SEGMENTS};
pub use weather::WeatherPreset;
