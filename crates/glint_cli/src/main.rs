//! `glint` - render a sphere scene to PPM or PNG.

mod cli;
mod output;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glint_renderer::scene::{builtin, BUILTIN_SCENES};
use glint_renderer::{render, render_parallel, Camera, SceneDescription};

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting glint");

    let mut description = load_scene(&args.scene, args.seed.unwrap_or(0))?;
    args.apply_overrides(&mut description.render);
    // The viewport always follows the output image shape
    description.camera.aspect_ratio = description.render.aspect_ratio();

    if args.dump_scene {
        println!("{}", description.to_json()?);
        return Ok(());
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let scene = description.build().context("Failed to build scene")?;
    let camera = Camera::new(&scene.camera).context("Failed to set up camera")?;

    let image = if args.serial {
        render(&camera, &scene.world, &scene.render)?
    } else {
        render_parallel(&camera, &scene.world, &scene.render, args.bucket_size)?
    };

    output::save(&image, Path::new(&args.output))
}

/// Resolve a built-in scene name or read a JSON description from disk.
fn load_scene(name: &str, seed: u64) -> Result<SceneDescription> {
    if let Some(description) = builtin(name, seed) {
        log::info!("Using built-in scene '{}'", name);
        return Ok(description);
    }

    let path = Path::new(name);
    if !path.is_file() {
        bail!(
            "Unknown scene '{}': expected one of {} or a path to a JSON scene description",
            name,
            BUILTIN_SCENES.join(", ")
        );
    }

    log::info!("Loading scene from {}", path.display());
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    SceneDescription::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
}
