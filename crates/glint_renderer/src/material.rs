//! Surface scattering models.
//!
//! A material decides what happens to a ray that reaches a surface: it either
//! scatters into a new ray with some attenuation, or it is absorbed.

use glint_math::Vec3;
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::random::{gen_f32, random_in_unit_sphere};
use crate::Ray;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// The outgoing ray and the per-channel attenuation applied to whatever it
/// brings back.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are immutable and shared read-only between spheres and threads.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough. Clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        let clamped = if fuzz.is_nan() { 0.0 } else { fuzz.clamp(0.0, 1.0) };
        if clamped != fuzz {
            log::warn!("Metal fuzz {} outside [0, 1], clamped to {}", fuzz, clamped);
        }
        Self { albedo, fuzz: clamped }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz may push the ray below the surface; it is absorbed then
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface (Snell's law).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn front_hit(normal: Vec3, material: &dyn Material) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            t: 1.0,
            front_face: true,
        }
    }

    #[test]
    fn test_lambertian_scatters_with_albedo() {
        let albedo = Color::new(0.8, 0.3, 0.3);
        let mat = Lambertian::new(albedo);
        let rec = front_hit(Vec3::Y, &mat);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..1000 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).expect("diffuse never absorbs");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().length_squared() > 0.0);
            // normal + point in unit sphere stays in the normal's hemisphere
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let rec = front_hit(Vec3::Y, &mat);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(4);

        let result = mat.scatter(&ray_in, &rec, &mut rng).expect("mirror reflects");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
        assert_eq!(result.attenuation, Color::new(0.8, 0.8, 0.8));
    }

    #[test]
    fn test_metal_never_scatters_into_surface() {
        let mat = Metal::new(Color::ONE, 1.0);
        let rec = front_hit(Vec3::Y, &mat);
        // Grazing incidence so fuzz regularly pushes below the surface
        let ray_in = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(5);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match mat.scatter(&ray_in, &rec, &mut rng) {
                Some(result) => {
                    assert!(result.scattered.direction().dot(rec.normal) > 0.0);
                    assert!(result.scattered.direction().length_squared() > 0.0);
                }
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -0.5).fuzz(), 0.0);
        assert_eq!(Metal::new(Color::ONE, 0.3).fuzz(), 0.3);
    }

    #[test]
    fn test_reflectance_zero_for_matched_index() {
        assert_eq!(reflectance(1.0, 1.0), 0.0);
        assert!(reflectance(0.0, 1.0) > 0.99);
        // Normal incidence on glass: r0 = 0.04
        assert!((reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_dielectric_matched_index_always_transmits() {
        let mat = Dielectric::new(1.0);
        let rec = front_hit(Vec3::Z, &mat);
        let ray_in = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -2.0));
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..100 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).expect("glass never absorbs");
            assert_eq!(result.attenuation, Color::ONE);
            assert!((result.scattered.direction() - Vec3::NEG_Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_dielectric_normal_incidence_mostly_refracts() {
        let mat = Dielectric::new(1.5);
        let rec = front_hit(Vec3::Z, &mat);
        let ray_in = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(7);

        let refracted = (0..1000)
            .filter_map(|_| mat.scatter(&ray_in, &rec, &mut rng))
            .filter(|r| r.scattered.direction().z < 0.0)
            .count();
        // Schlick gives 4% reflection at normal incidence
        assert!(refracted > 900 && refracted < 1000);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Exiting the glass (back face) at a steep angle
        let rec = HitRecord {
            front_face: false,
            ..front_hit(Vec3::Y, &mat)
        };
        let ray_in = Ray::new(Vec3::new(-1.0, 0.2, 0.0), Vec3::new(1.0, -0.2, 0.0));
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..100 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).expect("glass never absorbs");
            assert!(result.scattered.direction().y > 0.0);
        }
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(incoming, Vec3::Y, 1.0 / 1.5);

        assert!((out.length() - 1.0).abs() < 1e-5);
        assert!(out.y < 0.0);
        assert!(out.x < incoming.x);
    }
}
