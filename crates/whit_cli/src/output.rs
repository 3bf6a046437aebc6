//! Writing rendered images to disk.
//!
//! The renderer's buffer stores the bottom row first. Image files want the
//! top row first, while raw display surfaces take bottom-up rows padded to a
//! fixed byte alignment.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use whit_renderer::ImageBuffer;

/// Row alignment of raw framebuffer dumps.
pub const RAW_ROW_ALIGNMENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Ppm,
    /// Bottom-up RGB rows padded to [`RAW_ROW_ALIGNMENT`], no header
    Raw,
}

impl OutputFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("ppm") => Ok(Self::Ppm),
            Some("raw") => Ok(Self::Raw),
            _ => bail!(
                "Unsupported output extension for {} (expected .png, .ppm or .raw)",
                path.display()
            ),
        }
    }
}

/// Copy the buffer into an `image` crate image, top row first.
pub fn to_rgb_image(image: &ImageBuffer) -> RgbImage {
    RgbImage::from_fn(image.width, image.height, |x, y| {
        Rgb(image.get(image.height - 1 - y, x).unwrap_or_default())
    })
}

/// Bottom-up rows, each padded with zeros to a multiple of `alignment` bytes.
pub fn padded_rows(image: &ImageBuffer, alignment: usize) -> Vec<u8> {
    let alignment = alignment.max(1);
    let row_bytes = image.width as usize * 3;
    let stride = row_bytes.div_ceil(alignment) * alignment;

    let mut bytes = Vec::with_capacity(stride * image.height as usize);
    for row in 0..image.height {
        if let Some(pixels) = image.row(row) {
            bytes.extend_from_slice(bytemuck::cast_slice(pixels));
        }
        bytes.resize(bytes.len() + stride - row_bytes, 0);
    }
    bytes
}

/// Write `image` to `path` in the format its extension names.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    match format {
        OutputFormat::Png => to_rgb_image(image)
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        OutputFormat::Ppm => to_rgb_image(image)
            .save_with_format(path, ImageFormat::Pnm)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        OutputFormat::Raw => std::fs::write(path, padded_rows(image, RAW_ROW_ALIGNMENT))
            .with_context(|| format!("Failed to write {}", path.display()))?,
    }

    log::info!("Saved {:?} image to {}", format, path.display());
    Ok(())
}
