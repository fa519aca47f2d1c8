//! Morphology filters: channel minimum and flat square erosion.
//!
//! ## Border Handling
//!
//! Windows that reach past the image edge are clipped to the image. For a
//! minimum filter this is identical to replicating the border pixels, so
//! every output pixel is well defined.

use ndarray::{s, Array2, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut1, Axis, Zip};

/// Per-pixel minimum across all channels.
///
/// # Arguments
/// * `input` - Image (height, width, channels)
///
/// # Returns
/// 2D map (height, width) holding the darkest channel of every pixel
pub fn channel_min_f32(input: ArrayView3<f32>) -> Array2<f32> {
    input.map_axis(Axis(2), |px| px.fold(f32::INFINITY, |m, &v| m.min(v)))
}

/// Apply erosion with a flat square structuring element - f32 version.
///
/// The square is separable, so the filter runs as a horizontal pass
/// followed by a vertical pass. Rows (then columns) are processed in parallel.
///
/// # Arguments
/// * `input` - Single channel map (height, width)
/// * `size` - Side length of the square window; the window spans
///   `size / 2` pixels on each side of the center
///
/// # Returns
/// Eroded map with the same shape
pub fn min_filter_f32(input: ArrayView2<f32>, size: usize) -> Array2<f32> {
    let half = size / 2;
    if half == 0 {
        return input.to_owned();
    }

    let mut horizontal = Array2::<f32>::zeros(input.raw_dim());
    Zip::from(horizontal.rows_mut())
        .and(input.rows())
        .par_for_each(|dst, src| sliding_min(src, dst, half));

    let mut output = Array2::<f32>::zeros(input.raw_dim());
    Zip::from(output.columns_mut())
        .and(horizontal.columns())
        .par_for_each(|dst, src| sliding_min(src, dst, half));

    output
}

fn sliding_min(src: ArrayView1<f32>, mut dst: ArrayViewMut1<f32>, half: usize) {
    let len = src.len();
    for (i, out) in dst.iter_mut().enumerate() {
        let lo = i.saturating_sub(half);
        let hi = (i + half).min(len - 1);
        *out = src
            .slice(s![lo..=hi])
            .fold(f32::INFINITY, |m, &v| m.min(v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn brute_force_min(input: &Array2<f32>, size: usize) -> Array2<f32> {
        let (height, width) = input.dim();
        let half = (size / 2) as isize;
        let mut out = Array2::<f32>::zeros((height, width));
        for y in 0..height {
            for x in 0..width {
                let mut min_val = f32::INFINITY;
                for dy in -half..=half {
                    for dx in -half..=half {
                        // Replicate border
                        let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
                        let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
                        min_val = min_val.min(input[[sy, sx]]);
                    }
                }
                out[[y, x]] = min_val;
            }
        }
        out
    }

    #[test]
    fn test_channel_min_picks_darkest() {
        let mut img = Array3::<f32>::zeros((1, 2, 3));
        img[[0, 0, 0]] = 0.7;
        img[[0, 0, 1]] = 0.3;
        img[[0, 0, 2]] = 0.9;
        img[[0, 1, 0]] = 0.8;
        img[[0, 1, 1]] = 0.8;
        img[[0, 1, 2]] = 0.8;

        let result = channel_min_f32(img.view());
        assert_eq!(result[[0, 0]], 0.3);
        assert_eq!(result[[0, 1]], 0.8);
    }

    #[test]
    fn test_min_filter_spreads_dark_pixel() {
        let mut map = Array2::<f32>::ones((5, 5));
        map[[2, 2]] = 0.2;

        let result = min_filter_f32(map.view(), 3);

        // 3x3 neighborhood of the center picks up the dark value
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(result[[y, x]], 0.2);
            }
        }
        // Corners are outside the window
        assert_eq!(result[[0, 0]], 1.0);
        assert_eq!(result[[4, 4]], 1.0);
    }

    #[test]
    fn test_min_filter_size_one_is_identity() {
        let map = Array2::from_shape_fn((3, 4), |(y, x)| (y * 4 + x) as f32 / 12.0);

        let result = min_filter_f32(map.view(), 1);
        assert_eq!(result, map);
    }

    #[test]
    fn test_min_filter_border_is_defined() {
        // Bright border, the window must not invent zeros outside the image
        let map = Array2::<f32>::from_elem((2, 2), 0.6);

        let result = min_filter_f32(map.view(), 15);
        for &v in result.iter() {
            assert_eq!(v, 0.6);
        }
    }

    #[test]
    fn test_min_filter_matches_brute_force() {
        let map = Array2::from_shape_fn((7, 9), |(y, x)| {
            (((y * 31 + x * 17) % 13) as f32) / 13.0
        });

        for size in [1, 3, 5, 7] {
            let fast = min_filter_f32(map.view(), size);
            let slow = brute_force_min(&map, size);
            assert_eq!(fast, slow, "size {}", size);
        }
    }

    #[test]
    fn test_min_filter_single_row() {
        let map = Array2::from_shape_vec((1, 5), vec![0.5, 0.9, 0.1, 0.9, 0.7]).unwrap();

        let result = min_filter_f32(map.view(), 3);
        assert_eq!(
            result.into_raw_vec_and_offset().0,
            vec![0.5, 0.1, 0.1, 0.1, 0.7]
        );
    }
}
