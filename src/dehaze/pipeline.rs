//! End-to-end dehazing: dark channel, airlight, transmission, recovery.

use ndarray::{Array2, Array3, ArrayView3};
use std::time::Instant;

use super::{
    atmospheric_light, dark_channel, estimate_transmission, recover_radiance, validate_image,
    AtmosphericLight,
};
use crate::config::DehazeConfig;
use crate::error::Result;

/// Every artifact produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct DehazeOutput {
    /// Input image (height, width, 3)
    pub image: Array3<f32>,
    /// Dark channel of the input (height, width)
    pub dark_channel: Array2<f32>,
    /// Estimated airlight color
    pub atmospheric_light: AtmosphericLight,
    /// Refined transmission map (height, width), not re-clamped
    pub transmission: Array2<f32>,
    /// Recovered scene radiance (height, width, 3), values in [0, 1]
    pub dehazed: Array3<f32>,
}

impl DehazeOutput {
    /// Split into `(image, dark_channel, transmission, dehazed)`.
    pub fn into_parts(self) -> (Array3<f32>, Array2<f32>, Array2<f32>, Array3<f32>) {
        (self.image, self.dark_channel, self.transmission, self.dehazed)
    }
}

/// Dehaze an image with the default configuration.
pub fn dehaze(image: ArrayView3<f32>) -> Result<DehazeOutput> {
    dehaze_with_config(image, &DehazeConfig::default())
}

/// Dehaze an image.
///
/// Validates the configuration and the image, then runs the four stages in
/// order. Any stage error is returned unchanged; no partial output is
/// produced.
pub fn dehaze_with_config(image: ArrayView3<f32>, config: &DehazeConfig) -> Result<DehazeOutput> {
    config.validate()?;
    validate_image(image)?;

    let (height, width, _) = image.dim();
    let _span = tracing::debug_span!("dehaze", height, width).entered();

    let start = Instant::now();
    let dark = dark_channel(image, config.patch_size)?;
    tracing::debug!(
        patch_size = config.patch_size,
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "dark channel computed"
    );

    let start = Instant::now();
    let airlight = atmospheric_light(image, dark.view(), config.top_percent)?;
    tracing::debug!(
        ?airlight,
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "atmospheric light estimated"
    );

    let start = Instant::now();
    let transmission = estimate_transmission(
        image,
        &airlight,
        config.patch_size,
        config.omega,
        config.radius,
        config.epsilon,
    )?;
    let (t_min, t_max) = transmission
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &t| (lo.min(t), hi.max(t)));
    tracing::debug!(
        t_min,
        t_max,
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "transmission estimated"
    );

    let start = Instant::now();
    let dehazed = recover_radiance(image, transmission.view(), &airlight, config.t0)?;
    tracing::debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "radiance recovered"
    );

    Ok(DehazeOutput {
        image: image.to_owned(),
        dark_channel: dark,
        atmospheric_light: airlight,
        transmission,
        dehazed,
    })
}
