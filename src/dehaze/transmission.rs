//! Transmission map estimation.
//!
//! Normalizing the image by the airlight and taking its dark channel gives
//! the haze fraction of each neighborhood, so `t = 1 - omega * dark(I / A)`.
//! That coarse map inherits the blocky patches of the erosion; a guided
//! filter steered by the image's 8-bit gray levels snaps it back onto scene
//! edges.

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

use super::dark_channel::dark_channel_unchecked;
use super::{check_map_shape, check_rgb, AtmosphericLight};
use crate::config::{validate_epsilon, validate_omega, validate_patch_size};
use crate::error::Result;
use crate::filters::grayscale::gray_levels_f32;
use crate::filters::guided::guided_filter_f32;

/// Lower clip of the coarse transmission. Keeps recovery away from division
/// by zero and stops bright sky regions from turning black.
pub const TRANSMISSION_MIN: f32 = 0.1;

/// Smallest airlight component used as a divisor.
pub const AIRLIGHT_FLOOR: f32 = 1e-6;

/// Coarse transmission `clip(1 - omega * dark(I / A), 0.1, 1.0)`.
///
/// Airlight components are floored at [`AIRLIGHT_FLOOR`] before dividing.
pub fn coarse_transmission(
    image: ArrayView3<f32>,
    airlight: &AtmosphericLight,
    patch_size: usize,
    omega: f32,
) -> Result<Array2<f32>> {
    check_rgb(image)?;
    validate_patch_size(patch_size)?;
    validate_omega(omega)?;

    let mut normalized = image.to_owned();
    for (mut plane, &a) in normalized.axis_iter_mut(Axis(2)).zip(airlight.iter()) {
        plane /= a.max(AIRLIGHT_FLOOR);
    }

    let dark = dark_channel_unchecked(normalized.view(), patch_size);
    Ok(dark.mapv(|d| (1.0 - omega * d).clamp(TRANSMISSION_MIN, 1.0)))
}

/// Refine a coarse transmission map with a gray-level guided filter.
///
/// The guide is the image's gray level on the 0-255 scale, so `epsilon` is
/// small next to the variance of even faint edges. The result is not
/// re-clamped; values may drift outside [0.1, 1.0]. Radiance recovery
/// floors the transmission at `t0`.
///
/// # Arguments
/// * `image` - RGB image the guide gray levels are taken from
/// * `coarse` - Coarse transmission (height, width)
/// * `radius` - Guided filter window radius (default 60)
/// * `epsilon` - Guided filter regularization on the 0-255 guide scale (default 1e-3)
pub fn refine_transmission(
    image: ArrayView3<f32>,
    coarse: ArrayView2<f32>,
    radius: usize,
    epsilon: f32,
) -> Result<Array2<f32>> {
    check_rgb(image)?;
    check_map_shape("coarse transmission", coarse, image)?;
    validate_epsilon(epsilon)?;

    let guide = gray_levels_f32(image);
    Ok(guided_filter_f32(guide.view(), coarse, radius, epsilon))
}

/// Coarse estimate followed by guided refinement.
pub fn estimate_transmission(
    image: ArrayView3<f32>,
    airlight: &AtmosphericLight,
    patch_size: usize,
    omega: f32,
    radius: usize,
    epsilon: f32,
) -> Result<Array2<f32>> {
    let coarse = coarse_transmission(image, airlight, patch_size, omega)?;
    refine_transmission(image, coarse.view(), radius, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DehazeError;
    use ndarray::Array3;

    fn gradient_image() -> Array3<f32> {
        Array3::from_shape_fn((6, 6, 3), |(y, x, c)| {
            0.2 + 0.1 * ((y + x + c) % 7) as f32
        })
    }

    #[test]
    fn test_coarse_range_and_shape() {
        let img = gradient_image();

        let t = coarse_transmission(img.view(), &[0.9, 0.9, 0.9], 3, 0.95).unwrap();
        assert_eq!(t.dim(), (6, 6));
        assert!(t.iter().all(|&v| (TRANSMISSION_MIN..=1.0).contains(&v)));
    }

    #[test]
    fn test_coarse_formula() {
        let img = Array3::<f32>::from_elem((3, 3, 3), 0.4);

        // dark(I / A) = 0.5, t = 1 - 0.8 * 0.5
        let t = coarse_transmission(img.view(), &[0.8, 0.8, 0.8], 3, 0.8).unwrap();
        for &v in t.iter() {
            assert!((v - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn test_coarse_clips_dense_haze() {
        let img = Array3::<f32>::from_elem((3, 3, 3), 0.9);

        // Image equals airlight: 1 - 0.95 falls below the floor
        let t = coarse_transmission(img.view(), &[0.9, 0.9, 0.9], 3, 0.95).unwrap();
        assert!(t.iter().all(|&v| v == TRANSMISSION_MIN));
    }

    #[test]
    fn test_coarse_omega_monotone() {
        let img = gradient_image();
        let airlight = [0.95, 0.9, 0.85];

        let weak = coarse_transmission(img.view(), &airlight, 3, 0.5).unwrap();
        let strong = coarse_transmission(img.view(), &airlight, 3, 0.95).unwrap();
        for (s, w) in strong.iter().zip(weak.iter()) {
            assert!(s <= w);
        }
    }

    #[test]
    fn test_zero_airlight_component_stays_finite() {
        let img = gradient_image();

        let coarse = coarse_transmission(img.view(), &[0.0, 0.5, 0.5], 3, 0.95).unwrap();
        assert!(coarse.iter().all(|v| v.is_finite()));

        let refined = estimate_transmission(img.view(), &[0.0, 0.0, 0.0], 3, 0.95, 2, 1e-3).unwrap();
        assert!(refined.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_airlight_floor_applied() {
        // Red channel alone is dark; a zero red airlight blows it up past the
        // other channels, so the minimum comes from green and blue
        let mut img = Array3::<f32>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 0.001;
        img[[0, 0, 1]] = 0.5;
        img[[0, 0, 2]] = 0.5;

        let t = coarse_transmission(img.view(), &[0.0, 1.0, 1.0], 1, 1.0).unwrap();
        assert!((t[[0, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_refine_flat_map_unchanged() {
        let img = gradient_image();
        let coarse = Array2::<f32>::from_elem((6, 6), 0.6);

        let refined = refine_transmission(img.view(), coarse.view(), 60, 1e-3).unwrap();
        for &v in refined.iter() {
            assert!((v - 0.6).abs() < 1e-5);
        }
    }

    #[test]
    fn test_refine_keeps_low_contrast_edge() {
        // Halves differ by only 0.03 in intensity (8 gray levels)
        let img = Array3::from_shape_fn((20, 20, 3), |(_, x, _)| if x < 10 { 0.70 } else { 0.73 });
        let coarse = Array2::from_shape_fn((20, 20), |(_, x)| if x < 10 { 0.3 } else { 0.6 });

        let refined = refine_transmission(img.view(), coarse.view(), 60, 1e-3).unwrap();
        for ((_, x), &t) in refined.indexed_iter() {
            let expected = if x < 10 { 0.3 } else { 0.6 };
            assert!((t - expected).abs() < 1e-3, "x={} t={}", x, t);
        }
    }

    #[test]
    fn test_refine_does_not_clamp_overshoot() {
        // Coarse map falls with the guide on the left and stays flat on the
        // right; the single global fit extrapolates past both clip bounds
        let img = Array3::from_shape_fn((1, 4, 3), |(_, x, _)| [0.0, 0.2, 0.8, 1.0][x]);
        let coarse = Array2::from_shape_vec((1, 4), vec![1.0, 1.0, 0.1, 0.1]).unwrap();

        let refined = refine_transmission(img.view(), coarse.view(), 60, 1e-3).unwrap();
        assert!(refined[[0, 0]] > 1.0, "t={}", refined[[0, 0]]);
        assert!(refined[[0, 3]] < TRANSMISSION_MIN, "t={}", refined[[0, 3]]);
    }

    #[test]
    fn test_refine_rejects_mismatched_map() {
        let img = gradient_image();
        let coarse = Array2::<f32>::zeros((5, 6));

        let err = refine_transmission(img.view(), coarse.view(), 2, 1e-3).unwrap_err();
        assert!(matches!(err, DehazeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rejects_bad_omega() {
        let img = gradient_image();
        let err = coarse_transmission(img.view(), &[0.9; 3], 3, 1.5).unwrap_err();
        assert!(matches!(err, DehazeError::InvalidParameter { parameter: "omega", .. }));
    }
}
