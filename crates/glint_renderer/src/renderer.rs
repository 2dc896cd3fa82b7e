//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction on output

use std::time::Instant;

use glint_math::Interval;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::random::{gen_f32, pixel_rng};
use crate::{Camera, Color, HitRecord, Hittable, Ray};

/// Lower bound of every scene query, keeps secondary rays from re-hitting
/// the surface they start on.
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub image_width: u32,
    /// Output height in pixels
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Width over height, for matching the camera viewport to the image.
    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig("samples per pixel must be at least 1".into()));
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the world, multiplying in each surface's
/// attenuation until the ray escapes to the sky, is absorbed, or runs out
/// of bounces.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Out of bounces, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::from_min(T_MIN), &mut rec) {
        return sky_gradient(ray);
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Vertical white-to-blue environment seen by escaping rays.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct, clamp and quantize a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let unit = Interval::new(0.0, 1.0);
    let quantize = |c: f32| (255.0 * unit.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// Pixel `(0, 0)` is the top-left corner of the image. Returns the linear
/// average of all samples; gamma is applied only at output.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let x_span = config.image_width.saturating_sub(1).max(1) as f32;
    let y_span = config.image_height.saturating_sub(1).max(1) as f32;
    // Image rows run top-down, viewport t runs bottom-up
    let row = (config.image_height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / x_span;
        let t = (row + gen_f32(rng)) / y_span;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Linear color image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Gamma-corrected 8-bit triples in row-major order, top row first.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|color| color_to_rgb(*color)).collect()
    }

    /// Mean linear color over all pixels.
    pub fn average(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene on the calling thread.
///
/// Each pixel draws from its own seeded stream, so the result matches
/// [`crate::render_parallel`] bit for bit.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} (serial)",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    for y in 0..config.image_height {
        for x in 0..config.image_width {
            let mut rng = pixel_rng(config.seed, x, y, config.image_width);
            let color = render_pixel(camera, world, x, y, config, &mut rng);
            image.set(x, y, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{CameraConfig, Dielectric, HittableList, Lambertian, Material, Metal, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_sphere_world() -> HittableList {
        let mut world = HittableList::new();
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material).unwrap()));
        world
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y));
        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::NEG_Y));

        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
        assert_eq!(down, Color::new(1.0, 1.0, 1.0));
        // Direction length does not matter
        let scaled = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y * 7.0));
        assert!((scaled - up).length() < 1e-6);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = single_sphere_world();
        let mut rng = StdRng::seed_from_u64(1);

        for direction in [Vec3::NEG_Z, Vec3::Y, Vec3::new(0.3, -0.2, 1.0)] {
            let ray = Ray::new(Vec3::ZERO, direction);
            assert_eq!(ray_color(&ray, &world, 0, &mut rng), Color::ZERO);
            assert_eq!(ray_color(&ray, &HittableList::new(), 0, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_escaping_ray_sees_sky() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.2, 0.5, -1.0));

        assert_eq!(ray_color(&ray, &world, 50, &mut rng), sky_gradient(&ray));
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let mirror: Arc<dyn Material> = Arc::new(Metal::new(Color::ONE, 0.0));
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, 1001.0), 1000.0, mirror.clone()).unwrap()));
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1001.0), 1000.0, mirror).unwrap()));

        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(ray_color(&ray, &world, 50, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_center_ray_hits_single_sphere() {
        let world = single_sphere_world();
        let config = CameraConfig::default().with_aspect_ratio(16.0 / 9.0);
        let camera = Camera::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::from_min(T_MIN), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-5);

        let color = ray_color(&ray, &world, 50, &mut rng);
        assert_ne!(color, sky_gradient(&ray));
        assert!(color.max_element() <= 0.5 + 1e-6);
    }

    #[test]
    fn test_center_pixel_differs_from_background() {
        let world = single_sphere_world();
        let config = RenderConfig::default().with_resolution(16, 9).with_quality(8, 10);
        let camera = Camera::new(&CameraConfig::default().with_aspect_ratio(config.aspect_ratio())).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let hit = render_pixel(&camera, &world, 8, 4, &config, &mut rng);
        let sky = render_pixel(&camera, &HittableList::new(), 8, 4, &config, &mut rng);
        assert!(hit.length() > 0.0);
        assert!(hit.length() < sky.length());
    }

    #[test]
    fn test_render_is_reproducible() {
        let mut world = single_sphere_world();
        let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
        world.add(Arc::new(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, glass).unwrap()));

        let config = RenderConfig::default().with_resolution(12, 8).with_quality(4, 8).with_seed(7);
        let camera = Camera::new(&CameraConfig::default().with_aspect_ratio(config.aspect_ratio())).unwrap();

        let first = render(&camera, &world, &config).unwrap();
        let second = render(&camera, &world, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_rgb8(), second.to_rgb8());

        let reseeded = render(&camera, &world, &config.with_seed(8)).unwrap();
        assert_ne!(first, reseeded);
    }

    #[test]
    fn test_attenuation_never_amplifies() {
        // Camera looking straight down at a huge gray ground
        let gray: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1001.0, 0.0), 1000.0, gray).unwrap()));

        let config = RenderConfig::default().with_resolution(8, 8).with_quality(4, 10);
        let camera_config = CameraConfig::default()
            .with_position(Vec3::ZERO, Vec3::NEG_Y, Vec3::Z)
            .with_aspect_ratio(1.0);
        let camera = Camera::new(&camera_config).unwrap();

        let lit = render(&camera, &world, &config).unwrap();
        let background = render(&camera, &HittableList::new(), &config).unwrap();

        assert!(lit.pixels.iter().all(|c| c.max_element() <= 1.0));
        assert!(lit.average().length() < background.average().length());
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let world = HittableList::new();
        let camera = Camera::new(&CameraConfig::default()).unwrap();

        let no_samples = RenderConfig::default().with_quality(0, 10);
        assert!(matches!(render(&camera, &world, &no_samples), Err(RenderError::InvalidConfig(_))));

        let no_pixels = RenderConfig::default().with_resolution(0, 10);
        assert!(render(&camera, &world, &no_pixels).is_err());
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(4.0, -1.0, 0.25)), [255, 0, 127]);
    }

    #[test]
    fn test_image_buffer_row_major() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 0, Color::ONE);
        image.set(0, 1, Color::splat(0.25));

        let rgb = image.to_rgb8();
        assert_eq!(rgb.len(), 6);
        assert_eq!(rgb[2], [255, 255, 255]);
        assert_eq!(rgb[3], [127, 127, 127]);
        assert_eq!(image.get(2, 0), Color::ONE);
    }
}
