//! Gray-level conversion for guide images.
//!
//! Uses ITU-R BT.601 luma coefficients, the same weighting as the classic
//! RGB to gray conversion used by most imaging toolkits. The guide is built
//! on the 8-bit scale (0-255) so that regularization constants keep their
//! usual meaning relative to guide variance.

use ndarray::{Array2, Array3, ArrayView3, Axis};

/// ITU-R BT.601 luma coefficients in 14-bit fixed point (sum 1 << 14)
const LUMA_R_FIXED: u32 = 4899;
const LUMA_G_FIXED: u32 = 9617;
const LUMA_B_FIXED: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Convert an RGB f32 image to an 8-bit gray level map.
///
/// Each channel is first truncated to 0-255, then weighted with BT.601
/// coefficients in fixed point and rounded to the nearest level.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3) with values 0.0-1.0
///
/// # Returns
/// 2D map of shape (height, width) holding whole gray levels 0.0-255.0
pub fn gray_levels_f32(input: ArrayView3<f32>) -> Array2<f32> {
    input.map_axis(Axis(2), |px| {
        let level = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8 as u32;
        let weighted = LUMA_R_FIXED * level(px[0])
            + LUMA_G_FIXED * level(px[1])
            + LUMA_B_FIXED * level(px[2]);
        ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as f32
    })
}

/// Convert u8 image (0-255) to f32 (0.0-1.0)
pub fn u8_to_f32(input: ArrayView3<u8>) -> Array3<f32> {
    input.mapv(|v| v as f32 / 255.0)
}

/// Convert f32 image (0.0-1.0) to u8 (0-255), truncating
pub fn f32_to_u8(input: ArrayView3<f32>) -> Array3<u8> {
    input.mapv(|v| (v.clamp(0.0, 1.0) * 255.0) as u8)
}
