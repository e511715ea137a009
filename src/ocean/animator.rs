//! Height-field animator driving one ocean surface.

use glam::Vec3;
use log::{debug, error, info};

use super::clock::AnimationClock;
use super::mesh::PlaneGrid;
use super::wave::{ripple_offset, wave_height};
use crate::error::OceanError;
use crate::params::{ConfigPatch, SurfaceConfig, WeatherPreset};
use crate::scene::{Renderable, SceneContainer, SurfaceHandle, SurfaceMaterial, Transform};

/// Intensity used when the caller has no preference
pub const DEFAULT_RIPPLE_INTENSITY: f32 = 1.0;

/// Surface state that only exists between `initialize` and `cleanup`
struct ActiveSurface {
    handle: SurfaceHandle,
    renderable: Renderable,
    clock: AnimationClock,
}

/// Animates a procedural ocean surface registered with a [`SceneContainer`]
///
/// Every operation except [`initialize`](Self::initialize) is a silent no-op
/// while no surface is active (before initialization or after cleanup).
pub struct HeightFieldAnimator {
    /// Live configuration; amplitude and speed are read on every update
    pub config: SurfaceConfig,
    active: Option<ActiveSurface>,
}

impl Default for HeightFieldAnimator {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl HeightFieldAnimator {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Build the surface mesh and register it with `scene`
    ///
    /// Fails with [`OceanError::MissingScene`] when no scene is given and with
    /// [`OceanError::InvalidGrid`] for unbuildable dimensions; on failure the
    /// animator state is left untouched. Initializing again replaces the
    /// current surface, removing it from `scene` first.
    pub fn initialize(
        &mut self,
        scene: Option<&mut dyn SceneContainer>,
    ) -> Result<(), OceanError> {
        let Some(scene) = scene else {
            error!("Cannot initialize ocean surface: no scene container");
            return Err(OceanError::MissingScene);
        };
        if let Err(e) = self.config.validate() {
            error!("Cannot initialize ocean surface: {}", e);
            return Err(e);
        }

        if let Some(previous) = self.active.take() {
            debug!("Replacing existing surface {:?}", previous.handle);
            scene.remove_surface(previous.handle);
        }

        let geometry = PlaneGrid::new(self.config.width, self.config.height, self.config.segments);
        let renderable = Renderable::new(
            geometry,
            SurfaceMaterial::from_config(&self.config),
            Transform::horizontal(self.config.surface_elevation),
        );
        let handle = scene.add_surface(&renderable);

        info!(
            "Ocean surface initialized: {}x{} with {} segments ({} vertices) at elevation {}",
            self.config.width,
            self.config.height,
            self.config.segments,
            renderable.geometry.vertex_count(),
            self.config.surface_elevation
        );

        self.active = Some(ActiveSurface {
            handle,
            renderable,
            clock: AnimationClock::new(),
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// Advance the clock by `elapsed_s * wave_speed` and recompute every height
    pub fn update(&mut self, elapsed_s: f32) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let t = active.clock.advance(elapsed_s, self.config.wave_speed);
        let amplitude = self.config.wave_amplitude;
        active
            .renderable
            .geometry
            .set_heights(|p| wave_height(p.x, p.y, t, amplitude));
    }

    /// Add a localized ripple centred at world `(x, z)` on top of the current heights
    ///
    /// The ripple is transient: the next [`update`](Self::update) rewrites
    /// every height from the base wave, so call this after the frame's update.
    pub fn create_ripple(&mut self, x: f32, z: f32, intensity: f32) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let transform = active.renderable.transform;
        let center = transform
            .world_to_local(Vec3::new(x, transform.translation.y, z))
            .truncate();
        let t = active.clock.time();

        debug!(
            "Ripple at ({:.1}, {:.1}) intensity {:.2}, t={:.3}",
            x, z, intensity, t
        );
        active
            .renderable
            .geometry
            .add_heights(|p| ripple_offset(p.distance(center), t, intensity));
    }

    /// Merge `patch` into the configuration and the live material
    ///
    /// Colour, opacity and wireframe show immediately; amplitude and speed
    /// only affect later updates.
    pub fn set_properties(&mut self, patch: &ConfigPatch) {
        if patch.is_empty() {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        debug!("Surface properties: {:?}", patch);
        self.config.apply(patch);
        active.renderable.material = SurfaceMaterial::from_config(&self.config);
    }

    pub fn toggle_visibility(&mut self, visible: bool) {
        if let Some(active) = self.active.as_mut() {
            active.renderable.visible = visible;
        }
    }

    /// Apply a named weather preset; unknown names resolve to the default preset
    pub fn apply_weather(&mut self, name: &str) -> WeatherPreset {
        let preset = WeatherPreset::from_name(name);
        self.apply_preset(preset);
        preset
    }

    pub fn apply_preset(&mut self, preset: WeatherPreset) {
        if !self.is_initialized() {
            return;
        }
        info!(
            "Weather: {} (amplitude {}, speed {}, color {:#08x})",
            preset,
            preset.wave_amplitude(),
            preset.wave_speed(),
            preset.color()
        );
        self.set_properties(&preset.patch());
    }

    /// Remove the surface from `scene` and drop all animation state
    pub fn cleanup(&mut self, scene: &mut dyn SceneContainer) {
        let Some(active) = self.active.take() else {
            return;
        };
        scene.remove_surface(active.handle);
        info!("Ocean surface {:?} removed", active.handle);
    }

    /// Accumulated clock value, if a surface is active
    pub fn clock_time(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.clock.time())
    }

    pub fn handle(&self) -> Option<SurfaceHandle> {
        self.active.as_ref().map(|a| a.handle)
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        self.active.as_ref().map(|a| &a.renderable)
    }

    /// Mutable access for hosts syncing GPU state (e.g. clearing the dirty flag)
    pub fn renderable_mut(&mut self) -> Option<&mut Renderable> {
        self.active.as_mut().map(|a| &mut a.renderable)
    }

    /// World-space Y of the base wave (no ripples) at world `(x, z)`
    pub fn height_at(&self, world_x: f32, world_z: f32) -> Option<f32> {
        let active = self.active.as_ref()?;
        let transform = active.renderable.transform;
        let local =
            transform.world_to_local(Vec3::new(world_x, transform.translation.y, world_z));
        let h = wave_height(
            local.x,
            local.y,
            active.clock.time(),
            self.config.wave_amplitude,
        );
        Some(transform.local_to_world(Vec3::new(local.x, local.y, h)).y)
    }
}
