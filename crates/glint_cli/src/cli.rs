use clap::{Parser, ValueEnum};
use glint_renderer::{RenderConfig, DEFAULT_BUCKET_SIZE};
use log::LevelFilter;

/// Log levels selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Render a scene of spheres with a stochastic ray tracer")]
pub struct Args {
    /// Built-in scene (random, three-spheres, single) or path to a JSON scene description
    #[arg(long, default_value = "random")]
    pub scene: String,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounces per camera ray
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for the sampler and for the random scene layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Edge length of the square tiles handed to worker threads
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Render on the calling thread only
    #[arg(long)]
    pub serial: bool,

    /// Output file path (.png for PNG, anything else writes plain PPM)
    #[arg(short, long, default_value = "output.ppm")]
    pub output: String,

    /// Print the resolved scene description as JSON and exit
    #[arg(long)]
    pub dump_scene: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line values on top of the scene's own settings.
    pub fn apply_overrides(&self, render: &mut RenderConfig) {
        if let Some(width) = self.width {
            render.image_width = width;
        }
        if let Some(height) = self.height {
            render.image_height = height;
        }
        if let Some(samples) = self.samples {
            render.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            render.max_depth = max_depth;
        }
        if let Some(seed) = self.seed {
            render.seed = seed;
        }
    }
}
