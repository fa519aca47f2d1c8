//! Scene radiance recovery.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis, Zip};

use super::{check_map_shape, check_rgb, AtmosphericLight};
use crate::config::validate_t0;
use crate::error::Result;

/// Invert the haze model `I = J * t + A * (1 - t)`.
///
/// For every pixel and channel `J = (I - A) / max(t, t0) + A`, clipped to
/// [0, 1]. The `t0` floor bounds the `1 / t` amplification in dense haze.
///
/// # Arguments
/// * `image` - Observed hazy RGB image (height, width, 3)
/// * `transmission` - Transmission map (height, width)
/// * `airlight` - Atmospheric light
/// * `t0` - Transmission floor in (0, 1] (default 0.1)
///
/// # Returns
/// Dehazed RGB image with the same shape as `image`
pub fn recover_radiance(
    image: ArrayView3<f32>,
    transmission: ArrayView2<f32>,
    airlight: &AtmosphericLight,
    t0: f32,
) -> Result<Array3<f32>> {
    check_rgb(image)?;
    check_map_shape("transmission map", transmission, image)?;
    validate_t0(t0)?;

    let mut output = Array3::<f32>::zeros(image.raw_dim());
    Zip::from(output.lanes_mut(Axis(2)))
        .and(image.lanes(Axis(2)))
        .and(transmission)
        .par_for_each(|mut out, px, &t| {
            let t = t.max(t0);
            for c in 0..3 {
                out[c] = ((px[c] - airlight[c]) / t + airlight[c]).clamp(0.0, 1.0);
            }
        });

    Ok(output)
}
