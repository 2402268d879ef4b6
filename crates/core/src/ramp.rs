//! Force-to-color ramp for sensor cells
//!
//! A reading is first reduced to an integer band index ("mapped value") in
//! [0, 255], then looked up in a five-band ramp:
//!
//! | mapped      | color                          |
//! |-------------|--------------------------------|
//! | 0 ..= 12    | neutral grey (211, 211, 211)   |
//! | 13 ..= 76   | blue-green fading to green     |
//! | 77 ..= 140  | green warming toward yellow    |
//! | 141 ..= 204 | yellow to orange               |
//! | 205 ..= 255 | orange to pure red             |
//!
//! Every intermediate channel is truncated to an integer before normalizing,
//! and the band index itself uses floor division rather than rounding.

use crate::core_types::{Force, Rgb, Sensitivity};
use serde::{Deserialize, Serialize};

/// Force that maps to the top of the ramp at unit sensitivity
pub const DEFAULT_MAX_SCALE: f64 = 1000.0;

/// Grey level used for the idle band and for invalid inputs
pub const NEUTRAL_RGB8: [u8; 3] = [211, 211, 211];

/// Band index for a reading, or `None` when the divisor or scale is unusable.
///
/// `mapped = floor((value / sensitivity * 255) / max_scale)`, saturated to an
/// integer and clamped to [0, 255]. NaN readings land on 0.
#[must_use]
pub fn mapped_value(value: f64, sensitivity: f64, max_scale: f64) -> Option<u8> {
    if !Sensitivity::new(sensitivity).is_usable() || !(max_scale.is_finite() && max_scale > 0.0) {
        return None;
    }
    let scaled = ((value / sensitivity * 255.0) / max_scale).floor();
    Some((scaled as i64).clamp(0, 255) as u8)
}

/// Ramp color for a band index, in 0-255 channels
#[must_use]
pub fn ramp_rgb8(mapped: u8) -> [u8; 3] {
    let m = f64::from(mapped);
    if mapped > 204 {
        [255, (150.0 - (m - 204.0) * 150.0 / 51.0).max(0.0) as u8, 0]
    } else if mapped > 140 {
        [
            (139.0 + (m - 140.0) * 116.0 / 64.0) as u8,
            ((m - 140.0) * 150.0 / 64.0) as u8,
            0,
        ]
    } else if mapped > 76 {
        [
            (((m - 76.0) / 64.0) * 100.0) as u8,
            (255.0 - (m - 76.0) * 155.0 / 64.0) as u8,
            0,
        ]
    } else if mapped > 12 {
        [
            0,
            (255.0 - (m - 12.0) * 155.0 / 64.0) as u8,
            (100.0 - (m - 12.0) * 50.0 / 64.0) as u8,
        ]
    } else {
        NEUTRAL_RGB8
    }
}

/// Map a reading to its ramp color with channels in [0, 1].
///
/// A zero, negative or non-finite `sensitivity` (or `max_scale`) yields the
/// neutral grey rather than dividing by it.
#[must_use]
pub fn value_to_color(value: f64, sensitivity: f64, max_scale: f64) -> Rgb {
    match mapped_value(value, sensitivity, max_scale) {
        Some(mapped) => Rgb::from_rgb8(ramp_rgb8(mapped)),
        None => Rgb::LIGHT_GREY,
    }
}

/// Ramp bound to a fixed full-scale force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub max_scale: f64,
}

impl ColorRamp {
    #[must_use]
    pub fn new(max_scale: f64) -> Self {
        Self { max_scale }
    }

    /// Color for a force reading at the given sensitivity
    #[must_use]
    pub fn color(&self, force: Force, sensitivity: Sensitivity) -> Rgb {
        value_to_color(*force, sensitivity.value(), self.max_scale)
    }

    /// Force at which readings leave the neutral band
    #[must_use]
    pub fn neutral_ceiling(&self, sensitivity: Sensitivity) -> f64 {
        sensitivity.value() * 12.0 * self.max_scale / 255.0
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SCALE)
    }
}
