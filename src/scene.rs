//! Host-side collaborators: the drawable surface and the container it lives in.
//!
//! The animator owns its [`Renderable`] and writes the vertex buffer; a host
//! (GPU renderer or [`HeadlessScene`]) only registers it, reads it back each
//! frame, and releases whatever resources it allocated on removal.

use std::collections::BTreeSet;

use glam::{Mat4, Quat, Vec3};

use crate::ocean::PlaneGrid;
use crate::params::{rgb_to_linear, SurfaceConfig};

/// Opaque identifier a container issues for each added surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(pub u64);

/// Visual appearance of the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    /// Packed 0xRRGGBB sRGB colour
    pub color: u32,
    pub opacity: f32,
    pub wireframe: bool,
}

impl SurfaceMaterial {
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self {
            color: config.color,
            opacity: config.opacity,
            wireframe: config.wireframe,
        }
    }

    /// Linear RGBA for shaders
    pub fn linear_rgba(&self) -> [f32; 4] {
        let [r, g, b] = rgb_to_linear(self.color);
        [r, g, b, self.opacity]
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Placement of the surface in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Lay the local XY plane flat at `elevation` with its +Z face pointing up
    pub fn horizontal(elevation: f32) -> Self {
        Self {
            translation: Vec3::new(0.0, elevation, 0.0),
            rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    pub fn local_to_world(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.translation)
    }
}

/// Geometry, material and placement of one drawable surface
pub struct Renderable {
    pub geometry: PlaneGrid,
    pub material: SurfaceMaterial,
    pub transform: Transform,
    pub visible: bool,
}

impl Renderable {
    pub fn new(geometry: PlaneGrid, material: SurfaceMaterial, transform: Transform) -> Self {
        Self {
            geometry,
            material,
            transform,
            visible: true,
        }
    }
}

/// Scene graph that can hold surfaces
pub trait SceneContainer {
    /// Register a surface and allocate any host resources for it
    fn add_surface(&mut self, surface: &Renderable) -> SurfaceHandle;

    /// Unregister a surface and release its host resources
    fn remove_surface(&mut self, handle: SurfaceHandle);

    fn contains(&self, handle: SurfaceHandle) -> bool;
}

/// In-memory container with no rendering backend
#[derive(Debug, Default)]
pub struct HeadlessScene {
    surfaces: BTreeSet<SurfaceHandle>,
    next_id: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl SceneContainer for HeadlessScene {
    fn add_surface(&mut self, _surface: &Renderable) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next_id);
        self.next_id += 1;
        self.surfaces.insert(handle);
        handle
    }

    fn remove_surface(&mut self, handle: SurfaceHandle) {
        self.surfaces.remove(&handle);
    }

    fn contains(&self, handle: SurfaceHandle) -> bool {
        self.surfaces.contains(&handle)
    }
}
