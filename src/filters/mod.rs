//! Image filter primitives used by the dehazing stages.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB float | (H, W, 3) | f32 | Red, green, blue, 0.0-1.0 |
//! | Map float | (H, W) | f32 | Single channel (dark channel, transmission, gray-level guide) |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Read an `ndarray` view, return a newly allocated array
//! - **Shape preserving** - Output spatial shape equals input spatial shape
//! - **Defined borders** - Windows are clipped to the image, never padded with zeros
//! - **Thread-safe** - Use rayon (through ndarray's `Zip`) for row-parallel work
//!
//! ## Filter Categories
//!
//! - **Color**: gray-level guide, u8/f32 conversion
//! - **Morphology**: channel minimum, square erosion
//! - **Smoothing**: box mean, guided filter

pub mod blur;
pub mod grayscale;
pub mod guided;
pub mod morphology;
