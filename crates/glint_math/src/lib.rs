//! Glint math types.
//!
//! Vectors come straight from glam; `Vec3` doubles as point, direction and
//! color throughout the renderer.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;
