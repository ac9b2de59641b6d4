//! Decodes part images into RGBA buffers for the preview and the viewer.

use crate::error::{AppError, Result};
use image::imageops::FilterType;
use slint::{Image, Rgba8Pixel, SharedPixelBuffer};
use std::path::Path;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

fn decode(path: &Path) -> Result<image::DynamicImage> {
    let img = image::ImageReader::open(path)
        .map_err(|e| AppError::at_path(path, e))?
        .with_guessed_format()
        .map_err(|e| AppError::at_path(path, e))?
        .decode()
        .map_err(|e| match AppError::from(e) {
            AppError::Decode(msg) => AppError::Decode(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
    Ok(img)
}

/// Loads an image scaled down so neither edge exceeds `max_edge`.
///
/// Smaller images keep their size; aspect ratio is preserved.
pub fn load_preview(path: &Path, max_edge: u32) -> Result<PreviewImage> {
    let img = decode(path)?;
    let img = if img.width() > max_edge || img.height() > max_edge {
        img.resize(max_edge, max_edge, FilterType::Lanczos3)
    } else {
        img
    };
    Ok(into_preview(img))
}

/// Loads an image at full resolution.
pub fn load_full(path: &Path) -> Result<PreviewImage> {
    decode(path).map(into_preview)
}

fn into_preview(img: image::DynamicImage) -> PreviewImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreviewImage {
        data: rgba.into_raw(),
        width,
        height,
    }
}

/// Wraps decoded pixels in a Slint image.
pub fn create_slint_image(preview: &PreviewImage) -> Image {
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        &preview.data,
        preview.width,
        preview.height,
    );
    Image::from_rgba8(buffer)
}
