//! Height-field and ripple functions.
//!
//! Both are pure: the same inputs always give the same displacement, so a
//! replayed sequence of clock values reproduces identical frames.

/// Radius (world units) beyond which a ripple has no effect
pub const RIPPLE_RADIUS: f32 = 50.0;

/// Base wave height at plane coordinates `(x, y)` for clock value `t`
///
/// Four layered sine/cosine terms travelling in different directions:
/// along x, along y, and along both diagonals.
pub fn wave_height(x: f32, y: f32, t: f32, amplitude: f32) -> f32 {
    amplitude * 0.5 * (0.02 * x + t).sin()
        + amplitude * 0.3 * (0.025 * y + 1.3 * t).cos()
        + amplitude * 0.4 * (0.015 * (x + y) + 0.8 * t).sin()
        + amplitude * 0.2 * (0.018 * (x - y) + 1.7 * t).cos()
}

/// Additive ripple displacement at planar distance `d` from the ripple centre
///
/// Linear falloff to zero at [`RIPPLE_RADIUS`], further shaped by a clamped
/// cosine envelope. Returns exactly `0.0` for `d >= RIPPLE_RADIUS`.
pub fn ripple_offset(d: f32, t: f32, intensity: f32) -> f32 {
    if d.is_nan() || d >= RIPPLE_RADIUS {
        return 0.0;
    }
    let falloff = 1.0 - d / RIPPLE_RADIUS;
    let envelope = (0.1 * d).cos().max(0.0);
    (0.5 * d - 5.0 * t).sin() * (intensity * 3.0) * falloff * envelope
}
