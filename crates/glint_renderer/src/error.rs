//! Errors raised while building scenes, cameras and render settings.
//!
//! Rendering itself never fails; only construction does.

use thiserror::Error;

/// Errors that can occur before rendering starts.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Scene references undefined material: {0}")]
    UnknownMaterial(String),

    #[error("Scene description error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
