//! Image sinks for finished renders.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use glint_renderer::ImageBuffer;

/// Write plain-text PPM (P3), top row first.
pub fn write_ppm<W: Write>(writer: &mut W, image: &ImageBuffer) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for [r, g, b] in image.to_rgb8() {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Save an image, choosing the format from the file extension.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        let bytes: Vec<u8> = image.to_rgb8().into_iter().flatten().collect();
        let rgb = image::RgbImage::from_raw(image.width, image.height, bytes)
            .context("Pixel buffer does not match image dimensions")?;
        rgb.save(path)
            .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    } else {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_ppm(&mut writer, image).with_context(|| format!("Failed to write PPM {}", path.display()))?;
        writer.flush()?;
    }

    log::info!("Saved {}", path.display());
    Ok(())
}
