//! Visualizer configuration.

use crate::bars::DEFAULT_BAR_HEIGHT;
use crate::core_types::Sensitivity;
use crate::error::{Result, VizError};
use crate::grid::{GridGeometry, DEFAULT_ACTIVE_THRESHOLD};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::playback::DEFAULT_FPS;
use crate::ramp::{ColorRamp, DEFAULT_MAX_SCALE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Exported canvas width in pixels
pub const CANVAS_WIDTH: u32 = 1920;
/// Exported canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 1080;
/// Directory that receives the exported frame sequence
pub const DEFAULT_OUTPUT_DIR: &str = "composite_dental_animation";

/// Everything a dashboard and session need to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub geometry: GridGeometry,
    /// Force that maps to the top of the color ramp at unit sensitivity
    pub max_scale: f64,
    /// Readings above this are drawn opaque
    pub active_threshold: f64,
    /// Divisor applied to every reading before mapping
    pub sensitivity: f64,
    pub fps: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Samples kept for the force graph
    pub history_capacity: usize,
    /// Height of a full-scale bar in world units
    pub bar_max_height: f32,
    pub output_dir: PathBuf,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            geometry: GridGeometry::default(),
            max_scale: DEFAULT_MAX_SCALE,
            active_threshold: DEFAULT_ACTIVE_THRESHOLD,
            sensitivity: 1.0,
            fps: DEFAULT_FPS,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            bar_max_height: DEFAULT_BAR_HEIGHT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl VisualizerConfig {
    pub fn ramp(&self) -> ColorRamp {
        ColorRamp::new(self.max_scale)
    }

    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity::new(self.sensitivity)
    }

    pub fn canvas(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Check every field
    ///
    /// Sensitivity is only required to be finite: zero and negative values are
    /// accepted and render every cell in the neutral grey.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !(self.max_scale.is_finite() && self.max_scale > 0.0) {
            return Err(VizError::non_positive("max_scale", self.max_scale));
        }
        if !self.active_threshold.is_finite() {
            return Err(VizError::invalid_config(
                "active_threshold",
                format!("must be finite, got {}", self.active_threshold),
            ));
        }
        if !self.sensitivity.is_finite() {
            return Err(VizError::invalid_config(
                "sensitivity",
                format!("must be finite, got {}", self.sensitivity),
            ));
        }
        if self.fps == 0 || self.fps > 1000 {
            return Err(VizError::invalid_config(
                "fps",
                format!("must be in 1..=1000, got {}", self.fps),
            ));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(VizError::invalid_config(
                "canvas",
                format!(
                    "must be non-empty, got {}x{}",
                    self.canvas_width, self.canvas_height
                ),
            ));
        }
        if self.history_capacity == 0 {
            return Err(VizError::invalid_config(
                "history_capacity",
                "must keep at least one sample",
            ));
        }
        if !(self.bar_max_height.is_finite() && self.bar_max_height > 0.0) {
            return Err(VizError::non_positive(
                "bar_max_height",
                f64::from(self.bar_max_height),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = VisualizerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.canvas(), (1920, 1080));
        assert_eq!(config.fps, 10);
        assert_eq!(config.geometry.rows, 44);
        assert_eq!(config.geometry.cols, 52);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let cases = [
            VisualizerConfig {
                max_scale: 0.0,
                ..Default::default()
            },
            VisualizerConfig {
                fps: 0,
                ..Default::default()
            },
            VisualizerConfig {
                sensitivity: f64::NAN,
                ..Default::default()
            },
            VisualizerConfig {
                canvas_height: 0,
                ..Default::default()
            },
            VisualizerConfig {
                history_capacity: 0,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_zero_sensitivity_is_allowed() {
        let config = VisualizerConfig {
            sensitivity: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.sensitivity().is_usable());
    }
}
