//! Viewer window and camera configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Background colour (linear RGB)
    pub clear_color: [f64; 3],

    /// Direction toward the sun (world space, need not be normalized)
    pub light_direction: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 60.0,
            near_plane: 0.5,
            far_plane: 4000.0, // Covers the default 1000x1000 plane from the default eye
            clear_color: [0.52, 0.72, 0.88],
            light_direction: [0.3, 1.0, 0.4],
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Stationary viewer camera
#[derive(Debug, Clone)]
pub struct ViewCamera {
    /// Eye position (world units)
    pub position: [f32; 3],

    /// Look-at target (world units)
    pub target: [f32; 3],
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 120.0, 320.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}
