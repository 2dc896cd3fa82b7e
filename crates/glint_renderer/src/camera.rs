//! Thin-lens camera for ray generation.

use glint_math::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::random::random_in_unit_disk;
use crate::Ray;

/// User-facing camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Viewport width / height
    pub aspect_ratio: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from the lens to the plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

impl CameraConfig {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set viewport aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }
}

/// Immutable camera derived from a [`CameraConfig`].
///
/// `get_ray(0, 0)` aims at the lower-left corner of the viewport and
/// `get_ray(1, 1)` at the upper-right corner.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Validate the settings and precompute the viewport.
    pub fn new(config: &CameraConfig) -> RenderResult<Self> {
        if !(config.vfov > 0.0 && config.vfov < 180.0) {
            return Err(RenderError::DegenerateCamera("vertical fov must be in (0, 180) degrees"));
        }
        if !(config.aspect_ratio > 0.0 && config.aspect_ratio.is_finite()) {
            return Err(RenderError::DegenerateCamera("aspect ratio must be positive"));
        }
        if !(config.focus_dist > 0.0 && config.focus_dist.is_finite()) {
            return Err(RenderError::DegenerateCamera("focus distance must be positive"));
        }
        if !(config.aperture >= 0.0 && config.aperture.is_finite()) {
            return Err(RenderError::DegenerateCamera("aperture must be non-negative"));
        }

        let view = config.look_from - config.look_at;
        if view.length_squared() < 1e-12 {
            return Err(RenderError::DegenerateCamera("look_from and look_at coincide"));
        }
        let w = view.normalize();
        let side = config.vup.cross(w);
        if side.length_squared() < 1e-12 {
            return Err(RenderError::DegenerateCamera("up vector is parallel to the view direction"));
        }
        let u = side.normalize();
        let v = w.cross(u);

        let h = (config.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = config.aspect_ratio * viewport_height;

        // Scaling by focus_dist puts the viewport on the focus plane
        let origin = config.look_from;
        let horizontal = config.focus_dist * viewport_width * u;
        let vertical = config.focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - config.focus_dist * w;

        Ok(Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: config.aperture / 2.0,
        })
    }

    /// Generate a ray through normalized viewport coordinates `(s, t)`.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal camera basis `(u, v, w)`; `w` points away from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
