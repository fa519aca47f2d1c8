//! WebAssembly exports for the dehazing pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and take the
//! flat RGBA byte layout of a canvas `ImageData` buffer.

use ndarray::{s, Array3, Axis};
use wasm_bindgen::prelude::*;

use crate::config::DehazeConfig;
use crate::dehaze::dehaze_with_config;
use crate::filters::grayscale::{f32_to_u8, u8_to_f32};

/// Dehaze an RGBA u8 image with the default configuration.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of RGBA bytes, alpha copied from the input
#[wasm_bindgen]
pub fn dehaze_rgba_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    dehaze_rgba(data, width, height, &DehazeConfig::default())
}

/// Dehaze an RGBA u8 image with a JSON configuration.
///
/// Missing fields in `config_json` take their default values.
#[wasm_bindgen]
pub fn dehaze_rgba_with_config_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    config_json: &str,
) -> Result<Vec<u8>, JsValue> {
    let config = DehazeConfig::from_json_str(config_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    dehaze_rgba(data, width, height, &config)
}

fn dehaze_rgba(
    data: &[u8],
    width: usize,
    height: usize,
    config: &DehazeConfig,
) -> Result<Vec<u8>, JsValue> {
    let rgba = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .map_err(|_| JsValue::from_str("Invalid dimensions"))?;

    let rgb = u8_to_f32(rgba.slice(s![.., .., 0..3]));
    let output = dehaze_with_config(rgb.view(), config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let dehazed = f32_to_u8(output.dehazed.view());
    let mut result = rgba;
    for (mut dst, src) in result
        .axis_iter_mut(Axis(2))
        .take(3)
        .zip(dehazed.axis_iter(Axis(2)))
    {
        dst.assign(&src);
    }

    Ok(result.into_raw_vec_and_offset().0)
}
