//! Scene descriptions and built-in scenes.
//!
//! A [`SceneDescription`] is the serializable form of a scene: named
//! materials, spheres referencing them by name, plus camera and render
//! settings. [`SceneDescription::build`] turns it into a renderable
//! [`Scene`] in which every sphere naming the same material shares one
//! instance of it.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::{CameraConfig, Color, Dielectric, HittableList, Lambertian, Material, Metal, RenderConfig, Sphere};

/// Serializable material parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        refraction_index: f32,
    },
}

impl MaterialDesc {
    pub fn build(&self) -> Arc<dyn Material> {
        match self {
            MaterialDesc::Lambertian { albedo } => Arc::new(Lambertian::new(*albedo)),
            MaterialDesc::Metal { albedo, fuzz } => Arc::new(Metal::new(*albedo, *fuzz)),
            MaterialDesc::Dielectric { refraction_index } => Arc::new(Dielectric::new(*refraction_index)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f32,
    /// Key into [`SceneDescription::materials`]
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub spheres: Vec<SphereDesc>,
}

/// A scene ready to render.
pub struct Scene {
    pub world: HittableList,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_material(&mut self, name: impl Into<String>, material: MaterialDesc) -> &mut Self {
        self.materials.insert(name.into(), material);
        self
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: impl Into<String>) -> &mut Self {
        self.spheres.push(SphereDesc {
            center,
            radius,
            material: material.into(),
        });
        self
    }

    /// Instantiate materials once each and build the sphere list.
    pub fn build(&self) -> RenderResult<Scene> {
        let materials: HashMap<&str, Arc<dyn Material>> = self
            .materials
            .iter()
            .map(|(name, desc)| (name.as_str(), desc.build()))
            .collect();

        let mut world = HittableList::new();
        for sphere in &self.spheres {
            let material = materials
                .get(sphere.material.as_str())
                .ok_or_else(|| RenderError::UnknownMaterial(sphere.material.clone()))?;
            world.add(Arc::new(Sphere::new(sphere.center, sphere.radius, material.clone())?));
        }

        log::info!("Built scene: {} spheres, {} materials", world.len(), materials.len());
        Ok(Scene {
            world,
            camera: self.camera,
            render: self.render,
        })
    }
}

/// Names accepted by [`builtin`].
pub const BUILTIN_SCENES: [&str; 3] = ["random", "three-spheres", "single"];

/// Look up a built-in scene by name.
pub fn builtin(name: &str, seed: u64) -> Option<SceneDescription> {
    match name {
        "random" => Some(random_spheres(seed)),
        "three-spheres" => Some(three_spheres()),
        "single" => Some(single_sphere()),
        _ => None,
    }
}

/// One diffuse sphere straight ahead of a default camera, over a ground sphere.
pub fn single_sphere() -> SceneDescription {
    let mut scene = SceneDescription::default();
    scene
        .add_material("ground", MaterialDesc::Lambertian { albedo: Color::new(0.8, 0.8, 0.0) })
        .add_material("diffuse", MaterialDesc::Lambertian { albedo: Color::new(0.5, 0.5, 0.5) })
        .add_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, "ground")
        .add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, "diffuse");
    scene
}

/// Diffuse, glass and metal spheres side by side.
pub fn three_spheres() -> SceneDescription {
    let mut scene = SceneDescription::default();
    scene
        .add_material("ground", MaterialDesc::Lambertian { albedo: Color::new(0.8, 0.8, 0.0) })
        .add_material("center", MaterialDesc::Lambertian { albedo: Color::new(0.1, 0.2, 0.5) })
        .add_material("glass", MaterialDesc::Dielectric { refraction_index: 1.5 })
        .add_material("gold", MaterialDesc::Metal { albedo: Color::new(0.8, 0.6, 0.2), fuzz: 0.0 })
        .add_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, "ground")
        .add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, "center")
        .add_sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, "glass")
        .add_sphere(Vec3::new(1.0, 0.0, -1.0), 0.5, "gold");

    let look_from = Vec3::new(3.0, 3.0, 2.0);
    let look_at = Vec3::new(0.0, 0.0, -1.0);
    scene.camera = CameraConfig::default()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(20.0, 0.5, (look_from - look_at).length());
    scene
}

/// Large ground, three feature spheres and a field of small random ones.
///
/// The layout and materials depend only on `seed`.
pub fn random_spheres(seed: u64) -> SceneDescription {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = SceneDescription::default();

    scene
        .add_material("ground", MaterialDesc::Lambertian { albedo: Color::splat(0.5) })
        .add_material("glass", MaterialDesc::Dielectric { refraction_index: 1.5 })
        .add_sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, "ground");

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(a as f32 + 0.9 * rng.gen::<f32>(), 0.2, b as f32 + 0.9 * rng.gen::<f32>());
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let name = format!("small_{}_{}", a, b);
            if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                scene.add_material(name.clone(), MaterialDesc::Lambertian { albedo });
                scene.add_sphere(center, 0.2, name);
            } else if choose_mat < 0.95 {
                let albedo = Color::new(rng.gen_range(0.5..1.0), rng.gen_range(0.5..1.0), rng.gen_range(0.5..1.0));
                let fuzz = rng.gen_range(0.0..0.5);
                scene.add_material(name.clone(), MaterialDesc::Metal { albedo, fuzz });
                scene.add_sphere(center, 0.2, name);
            } else {
                scene.add_sphere(center, 0.2, "glass");
            }
        }
    }

    scene
        .add_material("brown", MaterialDesc::Lambertian { albedo: Color::new(0.4, 0.2, 0.1) })
        .add_material("steel", MaterialDesc::Metal { albedo: Color::new(0.7, 0.6, 0.5), fuzz: 0.0 })
        .add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, "glass")
        .add_sphere(Vec3::new(-4.0, 1.0, 0.0), 1.0, "brown")
        .add_sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, "steel");

    scene.render = RenderConfig::default().with_resolution(600, 400).with_quality(50, 50);
    scene.camera = CameraConfig::default()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect_ratio(scene.render.aspect_ratio());
    scene
}
