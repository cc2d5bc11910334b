// ============================================================
// Layer 6: PNG Output
// ============================================================
// Writes a GrayscaleImage to disk as an 8-bit grayscale PNG.
// Intensities are clamped to [0, 1] and scaled to [0, 255].

use anyhow::{bail, Context, Result};
use std::{fs::File, io::BufWriter, path::Path};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};

use crate::domain::image::GrayscaleImage;

/// Convert [0, 1] intensities to 8-bit luma values.
pub fn to_luma8(pixels: &[f32]) -> Vec<u8> {
    pixels
        .iter()
        .map(|&p| (p.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

/// Save `image` as a grayscale PNG at `path`.
pub fn save_png(path: impl AsRef<Path>, image: &GrayscaleImage) -> Result<()> {
    let path = path.as_ref();
    if image.width == 0 || image.height == 0 {
        bail!("Refusing to write an empty {}x{} image", image.width, image.height);
    }
    if image.pixels.len() != image.width * image.height {
        bail!(
            "Pixel buffer length {} does not match image size {}x{}",
            image.pixels.len(), image.width, image.height
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    PngEncoder::new(BufWriter::new(file))
        .write_image(
            &to_luma8(&image.pixels),
            image.width as u32,
            image.height as u32,
            ExtendedColorType::L8,
        )
        .with_context(|| format!("Failed to encode PNG '{}'", path.display()))?;

    tracing::debug!("Wrote {}x{} PNG to '{}'", image.width, image.height, path.display());
    Ok(())
}
