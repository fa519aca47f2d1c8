//! Guided filter (He, Sun, Tang) for single-channel guide and source maps.
//!
//! Within every window the output is modeled as a linear function of the
//! guide, `q = a * I + b`, fitted to the source `p` by regularized least
//! squares:
//!
//! ```text
//! a = cov(I, p) / (var(I) + eps)
//! b = mean(p) - a * mean(I)
//! ```
//!
//! The per-window coefficients are averaged over all windows covering a
//! pixel. Where the guide is flat `a` vanishes and the source is smoothed;
//! across strong guide edges `a` dominates and the edge is carried into the
//! output.

use ndarray::{Array2, ArrayView2, Zip};

use super::blur::box_mean_f32;

/// Apply the guided filter.
///
/// # Arguments
/// * `guide` - Guide map I (height, width), typically gray levels 0.0-255.0
/// * `src` - Map p to be filtered, same shape as `guide`
/// * `radius` - Window radius in pixels
/// * `eps` - Regularization; larger values smooth more and follow guide
///   edges less. Must be positive for flat guides to stay well defined.
///
/// # Returns
/// Filtered map with the same shape. The output is not clamped.
pub fn guided_filter_f32(
    guide: ArrayView2<f32>,
    src: ArrayView2<f32>,
    radius: usize,
    eps: f32,
) -> Array2<f32> {
    debug_assert_eq!(guide.dim(), src.dim());

    let mean_i = box_mean_f32(guide, radius);
    let mean_p = box_mean_f32(src, radius);
    let corr_ip = box_mean_f32((&guide * &src).view(), radius);
    let corr_ii = box_mean_f32((&guide * &guide).view(), radius);

    let mut a = Array2::<f32>::zeros(guide.raw_dim());
    let mut b = Array2::<f32>::zeros(guide.raw_dim());
    Zip::from(&mut a)
        .and(&mut b)
        .and(&mean_i)
        .and(&mean_p)
        .and(&corr_ip)
        .and(&corr_ii)
        .par_for_each(|a, b, &mi, &mp, &cip, &cii| {
            let cov = cip - mi * mp;
            // Cancellation can leave a tiny negative variance on flat guides
            let var = (cii - mi * mi).max(0.0);
            *a = cov / (var + eps);
            *b = mp - *a * mi;
        });

    let mean_a = box_mean_f32(a.view(), radius);
    let mean_b = box_mean_f32(b.view(), radius);

    let mut output = Array2::<f32>::zeros(guide.raw_dim());
    Zip::from(&mut output)
        .and(&mean_a)
        .and(&mean_b)
        .and(guide)
        .par_for_each(|q, &ma, &mb, &i| *q = ma * i + mb);

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_source_stays_constant() {
        let guide = Array2::from_shape_fn((6, 6), |(y, x)| ((y * 7 + x * 3) % 5) as f32 / 5.0);
        let src = Array2::<f32>::from_elem((6, 6), 0.7);

        let result = guided_filter_f32(guide.view(), src.view(), 2, 1e-3);
        for &v in result.iter() {
            assert!((v - 0.7).abs() < 1e-5, "got {}", v);
        }
    }

    #[test]
    fn test_flat_guide_gives_box_mean() {
        // No guide structure: a = 0, b = mean(p), output = mean(mean(p))
        let guide = Array2::<f32>::from_elem((1, 3), 0.5);
        let src = Array2::from_shape_vec((1, 3), vec![0.0, 0.6, 0.0]).unwrap();

        let result = guided_filter_f32(guide.view(), src.view(), 5, 1e-3);
        for &v in result.iter() {
            assert!((v - 0.2).abs() < 1e-5, "got {}", v);
        }
    }

    #[test]
    fn test_preserves_guide_edge() {
        // Source is a noisy version of a step that coincides with a guide edge
        let guide = Array2::from_shape_fn((8, 8), |(_, x)| if x < 4 { 0.1 } else { 0.9 });
        let src = Array2::from_shape_fn((8, 8), |(y, x)| {
            let base = if x < 4 { 0.2 } else { 0.8 };
            base + if (x + y) % 2 == 0 { 0.02 } else { -0.02 }
        });

        let result = guided_filter_f32(guide.view(), src.view(), 2, 1e-4);

        // Both sides keep their level, the step is not washed out
        assert!((result[[4, 3]] - 0.2).abs() < 0.05, "left {}", result[[4, 3]]);
        assert!((result[[4, 4]] - 0.8).abs() < 0.05, "right {}", result[[4, 4]]);
    }

    #[test]
    fn test_large_eps_smooths_edge() {
        let guide = Array2::from_shape_fn((1, 6), |(_, x)| if x < 3 { 0.1 } else { 0.9 });
        let src = guide.clone();

        let sharp = guided_filter_f32(guide.view(), src.view(), 60, 1e-6);
        let smooth = guided_filter_f32(guide.view(), src.view(), 60, 10.0);

        let sharp_step = sharp[[0, 3]] - sharp[[0, 2]];
        let smooth_step = smooth[[0, 3]] - smooth[[0, 2]];
        assert!(sharp_step > 0.7);
        assert!(smooth_step < 0.1);
    }

    #[test]
    fn test_output_is_finite_on_flat_inputs() {
        let guide = Array2::<f32>::zeros((4, 4));
        let src = Array2::<f32>::ones((4, 4));

        let result = guided_filter_f32(guide.view(), src.view(), 1, 1e-3);
        assert!(result.iter().all(|v| v.is_finite()));
    }
}
