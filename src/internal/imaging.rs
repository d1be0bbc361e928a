//! Normalizes generated images to the dataset's RGB PNG format and size.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, imageops::FilterType};

/// Decodes `bytes`, drops alpha, resizes to exactly `width`×`height` with
/// Lanczos3 when the size differs, and re-encodes as PNG.
pub fn normalize_png(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let rgb = if rgb.dimensions() == (width, height) {
        rgb
    } else {
        image::imageops::resize(&rgb, width, height, FilterType::Lanczos3)
    };

    let mut out = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}
