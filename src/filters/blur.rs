//! Box mean filter for single-channel float maps.
//!
//! Uses an integral image (summed-area table) so every output pixel costs
//! O(1) regardless of radius. Windows are clipped at the image border and
//! divided by the number of in-bounds pixels, so the border is not darkened.

use ndarray::{Array2, ArrayView2, Zip};

/// Local mean over a (2 * radius + 1) square window.
///
/// # Arguments
/// * `input` - Single channel map (height, width)
/// * `radius` - Window radius in pixels
///
/// # Returns
/// Mean-filtered map with the same shape
pub fn box_mean_f32(input: ArrayView2<f32>, radius: usize) -> Array2<f32> {
    let (height, width) = input.dim();
    let integral = integral_image(input);

    let mut output = Array2::<f32>::zeros((height, width));
    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(height);
        let x0 = x.saturating_sub(radius);
        let x1 = (x + radius + 1).min(width);

        // Inclusion-exclusion over the summed-area table
        let sum = integral[[y1, x1]] - integral[[y0, x1]] - integral[[y1, x0]] + integral[[y0, x0]];
        let count = ((y1 - y0) * (x1 - x0)) as f64;
        *out = (sum / count) as f32;
    });

    output
}

/// Summed-area table with a zero first row and column, accumulated in f64.
fn integral_image(input: ArrayView2<f32>) -> Array2<f64> {
    let (height, width) = input.dim();
    let mut integral = Array2::<f64>::zeros((height + 1, width + 1));

    for y in 0..height {
        let mut row_sum = 0.0f64;
        for x in 0..width {
            row_sum += input[[y, x]] as f64;
            integral[[y + 1, x + 1]] = integral[[y, x + 1]] + row_sum;
        }
    }

    integral
}
