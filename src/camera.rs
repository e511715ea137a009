//! Fixed viewer camera with cursor picking against the surface plane.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::params::{RenderConfig, ViewCamera};

/// Stationary camera looking at the ocean
pub struct CameraSystem {
    camera: ViewCamera,
}

impl CameraSystem {
    pub fn new(camera: ViewCamera) -> Self {
        Self { camera }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::from_array(self.camera.position)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.camera.target)
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, render_config: &RenderConfig) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(self.eye(), self.target(), Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );
        proj * view
    }

    /// Intersect the ray under `cursor` (window pixels, origin top-left) with
    /// the horizontal plane `y = plane_y`
    ///
    /// Returns `None` when the ray runs parallel to or away from the plane.
    pub fn pick_plane(
        &self,
        cursor: Vec2,
        render_config: &RenderConfig,
        plane_y: f32,
    ) -> Option<Vec3> {
        let width = render_config.window_width.max(1) as f32;
        let height = render_config.window_height.max(1) as f32;
        let ndc_x = cursor.x / width * 2.0 - 1.0;
        let ndc_y = 1.0 - cursor.y / height * 2.0;

        let inv_view_proj = self.view_proj(render_config).inverse();
        let unproject = |depth: f32| {
            let p = inv_view_proj * Vec4::new(ndc_x, ndc_y, depth, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        let dir = far - near;

        if dir.y.abs() < f32::EPSILON {
            return None;
        }
        let s = (plane_y - near.y) / dir.y;
        if s < 0.0 {
            return None;
        }
        Some(near + dir * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = CameraSystem::new(ViewCamera::default());
        let view_proj = camera.view_proj(&RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);
        assert!(view_proj.is_finite());
    }

    #[test]
    fn test_pick_screen_center_hits_target() {
        let camera = CameraSystem::new(ViewCamera::default());
        let config = RenderConfig::default();
        let center = Vec2::new(
            config.window_width as f32 / 2.0,
            config.window_height as f32 / 2.0,
        );

        let hit = camera.pick_plane(center, &config, 0.0).unwrap();
        assert!((hit - camera.target()).length() < 1.0, "hit {:?}", hit);
    }

    #[test]
    fn test_pick_above_horizon_misses() {
        let camera = CameraSystem::new(ViewCamera {
            position: [0.0, 10.0, 0.0],
            target: [0.0, 10.0, -100.0],
        });
        let config = RenderConfig::default();
        // Top edge of the window looks upward
        assert!(camera.pick_plane(Vec2::new(640.0, 0.0), &config, 0.0).is_none());
    }
}
