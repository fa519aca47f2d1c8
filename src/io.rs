//! Image ingestion and export.
//!
//! Decoding and encoding go through the `image` crate. Pixels enter the
//! pipeline as RGB f32 in [0, 1] and leave it as 8-bit RGB; the output format
//! is picked from the file extension.

use image::{GrayImage, RgbImage};
use ndarray::{Array3, ArrayView2, ArrayView3};
use std::path::Path;

use crate::error::{DehazeError, Result};
use crate::filters::grayscale::{f32_to_u8, u8_to_f32};

/// Decode an image file into an RGB f32 array of shape (height, width, 3).
///
/// Any color type is converted to 8-bit RGB first (alpha is dropped), then
/// scaled to [0, 1].
pub fn load_image(path: &Path) -> Result<Array3<f32>> {
    let decoded = image::open(path).map_err(|e| {
        DehazeError::invalid_input_from(format!("cannot decode {}", path.display()), e)
    })?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DehazeError::invalid_input(format!(
            "{} has zero area",
            path.display()
        )));
    }

    let pixels = Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())
        .map_err(|e| DehazeError::invalid_input_from("unexpected pixel buffer size", e))?;

    tracing::debug!(path = %path.display(), width, height, "image loaded");
    Ok(u8_to_f32(pixels.view()))
}

/// Encode an RGB f32 image as 8-bit and write it to `path`.
///
/// Samples are clamped to [0, 1] and truncated to 0-255. Missing parent
/// directories are created.
pub fn save_image(path: &Path, image: ArrayView3<f32>) -> Result<()> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(DehazeError::invalid_input(format!(
            "expected 3 channels (RGB), got {}",
            channels
        )));
    }

    let bytes: Vec<u8> = f32_to_u8(image).iter().copied().collect();
    let (w, h) = encoded_dims(width, height)?;
    let buffer = RgbImage::from_raw(w, h, bytes).ok_or_else(|| {
        DehazeError::invalid_input(format!("pixel buffer does not match {}x{}", width, height))
    })?;

    ensure_parent_dir(path)?;
    buffer
        .save(path)
        .map_err(|e| DehazeError::export(format!("cannot write {}", path.display()), e))?;

    tracing::debug!(path = %path.display(), "image written");
    Ok(())
}

/// Encode a single-channel map (dark channel, transmission) as 8-bit
/// grayscale.
pub fn save_gray(path: &Path, map: ArrayView2<f32>) -> Result<()> {
    let (height, width) = map.dim();
    let bytes: Vec<u8> = map
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect();
    let (w, h) = encoded_dims(width, height)?;
    let buffer = GrayImage::from_raw(w, h, bytes).ok_or_else(|| {
        DehazeError::invalid_input(format!("pixel buffer does not match {}x{}", width, height))
    })?;

    ensure_parent_dir(path)?;
    buffer
        .save(path)
        .map_err(|e| DehazeError::export(format!("cannot write {}", path.display()), e))
}

fn encoded_dims(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(DehazeError::invalid_input(format!(
            "cannot encode a {}x{} image",
            width, height
        ))),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| DehazeError::export(format!("cannot create {}", parent.display()), e)),
        _ => Ok(()),
    }
}
