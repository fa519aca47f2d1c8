//! Atmospheric light (airlight) estimation.
//!
//! The most haze-opaque pixels are the brightest ones in the dark channel;
//! the observed color there has converged toward the airlight.

use ndarray::{ArrayView2, ArrayView3};
use std::cmp::Ordering;

use super::{check_channels, check_map_shape, AtmosphericLight};
use crate::config::validate_top_percent;
use crate::error::{DehazeError, Result};

/// Estimate the airlight color.
///
/// Selects the `K = max(1, floor(N * top_percent))` pixels with the largest
/// dark-channel value (ties go to the lower row-major index) and averages
/// their image color per channel.
///
/// # Arguments
/// * `image` - RGB image (height, width, 3)
/// * `dark_channel` - Dark channel of `image` (height, width)
/// * `top_percent` - Fraction of pixels to average, in (0, 1] (default 0.0001)
///
/// # Errors
/// `DegenerateEstimate` when there are no pixels to select from.
pub fn atmospheric_light(
    image: ArrayView3<f32>,
    dark_channel: ArrayView2<f32>,
    top_percent: f64,
) -> Result<AtmosphericLight> {
    check_channels(image)?;
    check_map_shape("dark channel", dark_channel, image)?;
    validate_top_percent(top_percent)?;

    let num_pixels = dark_channel.len();
    if num_pixels == 0 {
        return Err(DehazeError::DegenerateEstimate {
            reason: "no pixels available for airlight selection".to_string(),
        });
    }

    let count = brightest_count(num_pixels, top_percent);
    let width = dark_channel.ncols();

    let mut sum = [0.0f64; 3];
    for index in brightest_indices(dark_channel, count) {
        let (y, x) = (index / width, index % width);
        for (c, acc) in sum.iter_mut().enumerate() {
            *acc += image[[y, x, c]] as f64;
        }
    }

    Ok(sum.map(|s| (s / count as f64) as f32))
}

/// Number of pixels averaged into the airlight.
///
/// `floor(num_pixels * top_percent)`, but never zero and never more than
/// the image holds. Tiny images would otherwise round down to nothing.
pub fn brightest_count(num_pixels: usize, top_percent: f64) -> usize {
    let count = (num_pixels as f64 * top_percent).floor() as usize;
    count.clamp(1, num_pixels.max(1))
}

/// Row-major indices of the `count` largest values, ordered by value
/// descending, then index ascending.
fn brightest_indices(values: ArrayView2<f32>, count: usize) -> Vec<usize> {
    let flat: Vec<f32> = values.iter().copied().collect();
    let mut indices: Vec<usize> = (0..flat.len()).collect();

    let order = |a: &usize, b: &usize| -> Ordering {
        flat[*b].total_cmp(&flat[*a]).then(a.cmp(b))
    };

    if count < indices.len() {
        indices.select_nth_unstable_by(count - 1, order);
        indices.truncate(count);
    }
    indices.sort_unstable_by(order);
    indices
}
