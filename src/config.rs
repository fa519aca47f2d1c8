//! Tunable parameters of the dehazing pipeline.
//!
//! Every stage parameter lives in [`DehazeConfig`] and is passed into the
//! pipeline explicitly, so callers can vary any of them per invocation.
//!
//! ```no_run
//! use dehazer_rust::DehazeConfig;
//! use std::path::Path;
//!
//! // Load from file (missing fields fall back to defaults)
//! let config = DehazeConfig::from_json_file(Path::new("dehaze.json"))?;
//!
//! // Or start from defaults
//! let config = DehazeConfig { omega: 0.8, ..DehazeConfig::default() };
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DehazeError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DehazeConfig {
    /// Side length of the square dark-channel neighborhood (positive, odd).
    /// Larger removes more haze but produces blockier transmission.
    pub patch_size: usize,

    /// Fraction of the brightest dark-channel pixels averaged into the
    /// airlight, in (0, 1].
    pub top_percent: f64,

    /// Haze removal strength in [0, 1]. Values below 1 keep a trace of haze
    /// on distant objects.
    pub omega: f32,

    /// Guided filter window radius in pixels.
    pub radius: usize,

    /// Guided filter regularization, relative to a guide of 8-bit gray
    /// levels (0-255). Larger values smooth across weaker edges.
    pub epsilon: f32,

    /// Transmission floor applied during radiance recovery, in (0, 1].
    pub t0: f32,
}

impl Default for DehazeConfig {
    fn default() -> Self {
        Self {
            patch_size: 15,
            top_percent: 0.0001,
            omega: 0.95,
            radius: 60,
            epsilon: 1e-3,
            t0: 0.1,
        }
    }
}

impl DehazeConfig {
    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<()> {
        validate_patch_size(self.patch_size)?;
        validate_top_percent(self.top_percent)?;
        validate_omega(self.omega)?;
        validate_epsilon(self.epsilon)?;
        validate_t0(self.t0)?;
        Ok(())
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DehazeError::config("invalid JSON configuration", e))
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DehazeError::config(format!("cannot read {}", path.display()), e)
        })?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DehazeError::config("cannot serialize configuration", e))
    }
}

pub(crate) fn validate_patch_size(patch_size: usize) -> Result<()> {
    if patch_size == 0 || patch_size % 2 == 0 {
        return Err(DehazeError::invalid_parameter(
            "patch_size",
            patch_size,
            "must be a positive odd integer",
        ));
    }
    Ok(())
}

pub(crate) fn validate_top_percent(top_percent: f64) -> Result<()> {
    if !(top_percent > 0.0 && top_percent <= 1.0) {
        return Err(DehazeError::invalid_parameter(
            "top_percent",
            top_percent,
            "must be in (0, 1]",
        ));
    }
    Ok(())
}

pub(crate) fn validate_omega(omega: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&omega) {
        return Err(DehazeError::invalid_parameter(
            "omega",
            omega,
            "must be in [0, 1]",
        ));
    }
    Ok(())
}

pub(crate) fn validate_epsilon(epsilon: f32) -> Result<()> {
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(DehazeError::invalid_parameter(
            "epsilon",
            epsilon,
            "must be positive and finite",
        ));
    }
    Ok(())
}

pub(crate) fn validate_t0(t0: f32) -> Result<()> {
    if !(t0 > 0.0 && t0 <= 1.0) {
        return Err(DehazeError::invalid_parameter("t0", t0, "must be in (0, 1]"));
    }
    Ok(())
}
