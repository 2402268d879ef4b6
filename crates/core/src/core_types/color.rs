//! RGB color type shared by the scene, the ramp and the rasterizer.

use crate::core_types::units::Opacity;
use serde::{Deserialize, Serialize};

/// Linear RGB color with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Neutral grey used for idle and data-less cells (211, 211, 211)
    pub const LIGHT_GREY: Rgb = Rgb {
        r: 211.0 / 255.0,
        g: 211.0 / 255.0,
        b: 211.0 / 255.0,
    };
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Build from floating channels, clamping each to [0, 1]
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Build from 0-255 channels
    #[must_use]
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: f32::from(rgb[0]) / 255.0,
            g: f32::from(rgb[1]) / 255.0,
            b: f32::from(rgb[2]) / 255.0,
        }
    }

    /// Convert to 0-255 channels, rounding to nearest
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Alpha-composite `self` over `background`
    #[must_use]
    pub fn over(self, background: Rgb, opacity: Opacity) -> Rgb {
        let a = opacity.value();
        Rgb {
            r: self.r * a + background.r * (1.0 - a),
            g: self.g * a + background.g * (1.0 - a),
            b: self.b * a + background.b * (1.0 - a),
        }
    }

    /// True when every channel is within [0, 1]
    #[must_use]
    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(rgb: [u8; 3]) -> Self {
        Rgb::from_rgb8(rgb)
    }
}
