//! Dark Channel Prior dehazing stages.
//!
//! The haze imaging model is `I = J * t + A * (1 - t)`: the observed image
//! `I` mixes scene radiance `J` with airlight `A` according to the per-pixel
//! transmission `t`. The stages estimate `A` and `t` from `I` alone and then
//! invert the model:
//!
//! 1. [`dark_channel`] - channel minimum followed by a square erosion
//! 2. [`atmospheric_light`] - mean color of the brightest dark-channel pixels
//! 3. [`estimate_transmission`] - coarse `1 - omega * dark(I / A)`, refined
//!    with a guided filter steered by 8-bit gray levels
//! 4. [`recover_radiance`] - `J = (I - A) / max(t, t0) + A`
//!
//! [`dehaze`] runs all four with a [`DehazeConfig`](crate::DehazeConfig).
//! Every stage is a pure function: inputs are borrowed views and each stage
//! allocates its own output.

pub mod atmosphere;
pub mod dark_channel;
pub mod pipeline;
pub mod recovery;
pub mod transmission;

pub use atmosphere::{atmospheric_light, brightest_count};
pub use dark_channel::dark_channel;
pub use pipeline::{dehaze, dehaze_with_config, DehazeOutput};
pub use recovery::recover_radiance;
pub use transmission::{coarse_transmission, estimate_transmission, refine_transmission};

use ndarray::{ArrayView2, ArrayView3};
use rayon::prelude::*;

use crate::error::{DehazeError, Result};

/// Airlight color, one value per RGB channel.
pub type AtmosphericLight = [f32; 3];

/// Require an RGB layout.
fn check_channels(image: ArrayView3<f32>) -> Result<()> {
    let channels = image.dim().2;
    if channels != 3 {
        return Err(DehazeError::invalid_input(format!(
            "expected 3 channels (RGB), got {}",
            channels
        )));
    }
    Ok(())
}

/// Require an RGB layout with a non-empty pixel grid.
fn check_rgb(image: ArrayView3<f32>) -> Result<()> {
    check_channels(image)?;
    let (height, width, _) = image.dim();
    if height == 0 || width == 0 {
        return Err(DehazeError::invalid_input(format!(
            "image has zero area ({}x{})",
            width, height
        )));
    }
    Ok(())
}

/// Require a 2-D artifact to cover the same pixel grid as the image.
fn check_map_shape(what: &'static str, map: ArrayView2<f32>, image: ArrayView3<f32>) -> Result<()> {
    let (height, width, _) = image.dim();
    if map.dim() != (height, width) {
        return Err(DehazeError::ShapeMismatch {
            what,
            expected: (height, width),
            actual: map.dim(),
        });
    }
    Ok(())
}

/// Full input contract: RGB, non-empty, every sample finite and in [0, 1].
///
/// Contiguous images are scanned in parallel.
pub fn validate_image(image: ArrayView3<f32>) -> Result<()> {
    check_rgb(image)?;
    let out_of_range = |v: &f32| !(0.0..=1.0).contains(v);
    let bad = match image.as_slice_memory_order() {
        Some(samples) => samples.par_iter().copied().find_any(out_of_range),
        None => image.iter().copied().find(out_of_range),
    };
    if let Some(bad) = bad {
        return Err(DehazeError::invalid_input(format!(
            "sample {} outside [0, 1]",
            bad
        )));
    }
    Ok(())
}
