//! Glint renderer - CPU ray tracing of sphere scenes.
//!
//! A Monte Carlo ray tracer with diffuse, metal and glass materials, a
//! thin-lens camera, and serial or bucketed parallel image loops.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
pub mod random;
mod renderer;
pub mod scene;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraConfig};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, reflectance, refract, Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, ImageBuffer, RenderConfig, T_MIN,
};
pub use scene::{Scene, SceneDescription};
pub use sphere::Sphere;

/// Re-export math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
