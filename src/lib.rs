//! Tidewave library - animated procedural ocean surface
//!
//! A [`ocean::HeightFieldAnimator`] displaces a flat grid with layered sine
//! waves, stacks transient ripples on top, and exposes weather presets that
//! retune amplitude, speed and colour. Any [`scene::SceneContainer`] can host
//! the resulting surface: the wgpu [`rendering::RenderSystem`] or the
//! in-memory [`scene::HeadlessScene`].

pub mod camera;
pub mod cli;
pub mod error;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod scene;

pub use error::OceanError;
