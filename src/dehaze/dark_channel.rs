//! Dark channel extraction.
//!
//! Haze-free outdoor patches almost always contain some pixel that is close
//! to zero in at least one channel. The dark channel measures how far a
//! neighborhood is from that prior: the darker it stays, the less haze.

use ndarray::{Array2, ArrayView3};

use super::check_rgb;
use crate::config::validate_patch_size;
use crate::error::Result;
use crate::filters::morphology::{channel_min_f32, min_filter_f32};

/// Compute the dark channel of an RGB image.
///
/// Takes the per-pixel channel minimum, then erodes it with a flat square of
/// side `patch_size` (border replicated).
///
/// # Arguments
/// * `image` - RGB image (height, width, 3)
/// * `patch_size` - Positive odd neighborhood size (default 15)
///
/// # Returns
/// Dark channel (height, width), bounded by the input channel minimum
pub fn dark_channel(image: ArrayView3<f32>, patch_size: usize) -> Result<Array2<f32>> {
    check_rgb(image)?;
    validate_patch_size(patch_size)?;
    Ok(dark_channel_unchecked(image, patch_size))
}

/// Dark channel without input checks, also used on airlight-normalized
/// images whose samples may exceed 1.
pub(crate) fn dark_channel_unchecked(image: ArrayView3<f32>, patch_size: usize) -> Array2<f32> {
    let min_channel = channel_min_f32(image);
    min_filter_f32(min_channel.view(), patch_size)
}
