//! Dehazer Rust
//!
//! Single-image haze removal with the Dark Channel Prior, with Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! The pipeline works on RGB float images:
//! - **Image**: (height, width, 3) `f32`, channel order R, G, B, values 0.0-1.0
//! - **Maps**: (height, width) `f32` for the dark channel and transmission
//! - **Airlight**: `[f32; 3]`
//!
//! ## Pipeline
//! 1. Dark channel: channel minimum, then square erosion (`patch_size`)
//! 2. Atmospheric light: mean color of the brightest dark-channel pixels (`top_percent`)
//! 3. Transmission: `1 - omega * dark(I / A)` clipped to [0.1, 1], refined by a
//!    guided filter steered by 8-bit gray levels (`radius`, `epsilon`)
//! 4. Recovery: `J = (I - A) / max(t, t0) + A`, clipped to [0, 1]
//!
//! ```
//! use dehazer_rust::{dehaze_with_config, DehazeConfig};
//! use ndarray::Array3;
//!
//! let hazy = Array3::<f32>::from_elem((32, 32, 3), 0.6);
//! let config = DehazeConfig { patch_size: 7, ..DehazeConfig::default() };
//! let out = dehaze_with_config(hazy.view(), &config)?;
//! assert_eq!(out.dehazed.dim(), (32, 32, 3));
//! # Ok::<(), dehazer_rust::DehazeError>(())
//! ```
//!
//! ## Features
//! - `python`: numpy bindings (`dehazer_rust` extension module)
//! - `wasm`: wasm-bindgen export on RGBA byte buffers
//! - `io`: file decoding and encoding through the `image` crate
//! - `cli`: the `dehaze` command-line tool

pub mod config;
pub mod dehaze;
pub mod error;
pub mod filters;

#[cfg(feature = "io")]
pub mod io;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::DehazeConfig;
pub use dehaze::{
    atmospheric_light, coarse_transmission, dark_channel, dehaze, dehaze_with_config,
    estimate_transmission, recover_radiance, refine_transmission, validate_image,
    AtmosphericLight, DehazeOutput,
};
pub use error::{DehazeError, Result};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::DehazeConfig;
    use crate::dehaze as stages;
    use crate::error::DehazeError;

    fn to_py_err(err: DehazeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Dark channel of an RGB f32 image (H, W, 3) -> (H, W).
    #[pyfunction]
    #[pyo3(signature = (image, patch_size=15))]
    pub fn dark_channel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        patch_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let result = stages::dark_channel(image.as_array(), patch_size).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    /// Airlight color as an (r, g, b) tuple.
    #[pyfunction]
    #[pyo3(signature = (image, dark_channel, top_percent=0.0001))]
    pub fn atmospheric_light<'py>(
        image: PyReadonlyArray3<'py, f32>,
        dark_channel: PyReadonlyArray2<'py, f32>,
        top_percent: f64,
    ) -> PyResult<(f32, f32, f32)> {
        let [r, g, b] =
            stages::atmospheric_light(image.as_array(), dark_channel.as_array(), top_percent)
                .map_err(to_py_err)?;
        Ok((r, g, b))
    }

    /// Refined transmission map (H, W).
    #[pyfunction]
    #[pyo3(signature = (image, airlight, patch_size=15, omega=0.95, radius=60, epsilon=1e-3))]
    pub fn transmission<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        airlight: [f32; 3],
        patch_size: usize,
        omega: f32,
        radius: usize,
        epsilon: f32,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let result = stages::estimate_transmission(
            image.as_array(),
            &airlight,
            patch_size,
            omega,
            radius,
            epsilon,
        )
        .map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    /// Recovered scene radiance (H, W, 3), values 0.0-1.0.
    #[pyfunction]
    #[pyo3(signature = (image, transmission, airlight, t0=0.1))]
    pub fn recover_radiance<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        transmission: PyReadonlyArray2<'py, f32>,
        airlight: [f32; 3],
        t0: f32,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let result =
            stages::recover_radiance(image.as_array(), transmission.as_array(), &airlight, t0)
                .map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Full Pipeline
    // ========================================================================

    /// Run the whole pipeline.
    ///
    /// Returns `(image, dark_channel, transmission, dehazed)`.
    #[pyfunction]
    #[pyo3(signature = (
        image,
        patch_size=15,
        top_percent=0.0001,
        omega=0.95,
        radius=60,
        epsilon=1e-3,
        t0=0.1
    ))]
    #[allow(clippy::too_many_arguments, clippy::type_complexity)]
    pub fn dehaze<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        patch_size: usize,
        top_percent: f64,
        omega: f32,
        radius: usize,
        epsilon: f32,
        t0: f32,
    ) -> PyResult<(
        Bound<'py, PyArray3<f32>>,
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray3<f32>>,
    )> {
        let config = DehazeConfig {
            patch_size,
            top_percent,
            omega,
            radius,
            epsilon,
            t0,
        };
        let output = stages::dehaze_with_config(image.as_array(), &config).map_err(to_py_err)?;
        let (image, dark, transmission, dehazed) = output.into_parts();
        Ok((
            image.into_pyarray(py),
            dark.into_pyarray(py),
            transmission.into_pyarray(py),
            dehazed.into_pyarray(py),
        ))
    }

    #[pymodule]
    pub fn dehazer_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(dark_channel, m)?)?;
        m.add_function(wrap_pyfunction!(atmospheric_light, m)?)?;
        m.add_function(wrap_pyfunction!(transmission, m)?)?;
        m.add_function(wrap_pyfunction!(recover_radiance, m)?)?;
        m.add_function(wrap_pyfunction!(dehaze, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::dehazer_rust;
