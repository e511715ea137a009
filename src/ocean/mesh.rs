//! Plane grid with immutable base coordinates and a live displaced buffer.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::params::MAX_SEGMENTS;

/// Vertex data for the surface mesh (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Regular grid in the local XY plane, displaced along local +Z
///
/// `base` and `vertices` are index-aligned: `vertices[i]` always has the x/y
/// of `base[i]`, only its z (height) changes.
pub struct PlaneGrid {
    base: Box<[Vec2]>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    line_indices: Vec<u32>,
    dirty: bool,
}

impl PlaneGrid {
    /// Build a flat `width` x `height` grid with `segments` quads per side
    ///
    /// Rows run from +height/2 down to -height/2, columns from -width/2 to
    /// +width/2. `segments` is clamped to `1..=MAX_SEGMENTS` so every index
    /// fits in `u32`.
    pub fn new(width: f32, height: f32, segments: u32) -> Self {
        let n = segments.clamp(1, MAX_SEGMENTS) as usize;
        let side = n + 1;
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let step_x = width / n as f32;
        let step_y = height / n as f32;

        let mut base = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                base.push(Vec2::new(
                    col as f32 * step_x - half_w,
                    half_h - row as f32 * step_y,
                ));
            }
        }

        let vertices = base
            .iter()
            .map(|p| Vertex {
                position: [p.x, p.y, 0.0],
                normal: [0.0, 0.0, 1.0],
            })
            .collect();

        // Two CCW triangles per quad, facing +Z:
        //   a──d
        //   │╲ │   Triangle 1: a, b, d
        //   │ ╲│   Triangle 2: b, c, d
        //   b──c
        let mut indices = Vec::with_capacity(n * n * 6);
        for row in 0..n {
            for col in 0..n {
                let a = (row * side + col) as u32;
                let b = ((row + 1) * side + col) as u32;
                let c = b + 1;
                let d = a + 1;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        // Wireframe edges: rows then columns
        let mut line_indices = Vec::with_capacity(side * n * 4);
        for row in 0..side {
            for col in 0..n {
                let i = (row * side + col) as u32;
                line_indices.extend_from_slice(&[i, i + 1]);
            }
        }
        for row in 0..n {
            for col in 0..side {
                let i = (row * side + col) as u32;
                line_indices.extend_from_slice(&[i, i + side as u32]);
            }
        }

        Self {
            base: base.into_boxed_slice(),
            vertices,
            indices,
            line_indices,
            dirty: true,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.base.len()
    }

    /// Undisplaced plane coordinates
    pub fn base(&self) -> &[Vec2] {
        &self.base
    }

    /// Live vertex buffer
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn line_indices(&self) -> &[u32] {
        &self.line_indices
    }

    pub fn height(&self, index: usize) -> f32 {
        self.vertices[index].position[2]
    }

    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v.position[2])
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Overwrite every height with `height_fn(base)`
    pub fn set_heights(&mut self, mut height_fn: impl FnMut(Vec2) -> f32) {
        for (p, vertex) in self.base.iter().zip(self.vertices.iter_mut()) {
            vertex.position[2] = height_fn(*p);
        }
        self.finish_write();
    }

    /// Add `offset_fn(base)` to every current height
    pub fn add_heights(&mut self, mut offset_fn: impl FnMut(Vec2) -> f32) {
        for (p, vertex) in self.base.iter().zip(self.vertices.iter_mut()) {
            vertex.position[2] += offset_fn(*p);
        }
        self.finish_write();
    }

    fn finish_write(&mut self) {
        self.recompute_normals();
        self.dirty = true;
    }

    /// Recompute smooth per-vertex normals from the live positions
    ///
    /// Each triangle's unnormalized cross product (proportional to its area)
    /// is accumulated at its three corners, then normalized.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let face_normal = (p1 - p0).cross(p2 - p0);
            accum[i0] += face_normal;
            accum[i1] += face_normal;
            accum[i2] += face_normal;
        }

        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            // Degenerate vertex (zero contributions): default to +Z
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Z).into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let grid = PlaneGrid::new(100.0, 80.0, 10);
        assert_eq!(grid.vertex_count(), 11 * 11);
        assert_eq!(grid.vertices().len(), grid.base().len());
        assert_eq!(grid.indices().len(), 10 * 10 * 6);
        // 11 rows of 10 edges plus 10 rows of 11 edges, two indices each
        assert_eq!(grid.line_indices().len(), (11 * 10 + 10 * 11) * 2);
    }

    #[test]
    fn test_grid_extent_and_center() {
        let grid = PlaneGrid::new(100.0, 80.0, 10);
        let base = grid.base();
        assert_eq!(base[0], Vec2::new(-50.0, 40.0));
        assert_eq!(base[base.len() - 1], Vec2::new(50.0, -40.0));
        // Even segment count puts a vertex exactly at the origin
        assert_eq!(base[5 * 11 + 5], Vec2::ZERO);
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mut grid = PlaneGrid::new(10.0, 10.0, 4);
        grid.recompute_normals();
        for v in grid.vertices() {
            assert!(v.normal[2] > 0.999, "normal {:?}", v.normal);
        }
    }

    #[test]
    fn test_set_heights_keeps_xy() {
        let mut grid = PlaneGrid::new(20.0, 20.0, 4);
        grid.take_dirty();
        grid.set_heights(|p| p.x * 0.5);
        assert!(grid.is_dirty());
        for (p, v) in grid.base().iter().zip(grid.vertices()) {
            assert_eq!(v.position[0], p.x);
            assert_eq!(v.position[1], p.y);
            assert_eq!(v.position[2], p.x * 0.5);
        }
    }

    #[test]
    fn test_add_heights_stacks() {
        let mut grid = PlaneGrid::new(20.0, 20.0, 2);
        grid.set_heights(|_| 1.0);
        grid.add_heights(|_| 0.5);
        assert!(grid.heights().all(|h| h == 1.5));
    }

    #[test]
    fn test_sloped_normals_tilt_against_slope() {
        let mut grid = PlaneGrid::new(10.0, 10.0, 4);
        // Rising toward +x: normals lean toward -x
        grid.set_heights(|p| p.x);
        for v in grid.vertices() {
            assert!(v.normal[0] < 0.0);
            assert!(v.normal[2] > 0.0);
        }
    }

    #[test]
    fn test_take_dirty_clears() {
        let mut grid = PlaneGrid::new(10.0, 10.0, 1);
        assert!(grid.take_dirty());
        assert!(!grid.take_dirty());
    }
}
