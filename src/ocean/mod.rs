//! Procedural ocean surface: height field, ripples and the animator that applies them.

mod animator;
mod clock;
mod mesh;
mod wave;

// Re-export public types
pub use animator::{HeightFieldAnimator, DEFAULT_RIPPLE_INTENSITY};
pub use clock::AnimationClock;
pub use mesh::{PlaneGrid, Vertex};
pub use wave::{ripple_offset, wave_height, RIPPLE_RADIUS};
