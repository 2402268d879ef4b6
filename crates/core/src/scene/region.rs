//! Renderable regions and text labels held by a view.

use crate::core_types::{Opacity, Rgb, Vec2};
use serde::{Deserialize, Serialize};

/// Handle to a region owned by a [`View`](super::View)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub(crate) u64);

/// Handle to a label owned by a [`View`](super::View)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelId(pub(crate) u64);

/// Axis-aligned rectangle in view coordinates (y increases upward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from two corners in any order
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Square of side `side` centered on `center`
    pub fn square(center: Vec2, side: f32) -> Self {
        let half = Vec2::new(side / 2.0, side / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Geometry of a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Flat rectangle in the view plane
    Rect(Rect),
    /// Vertical column standing on a ground-plane footprint
    Column { footprint: Rect, height: f32 },
}

/// A colored region in a view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub shape: Shape,
    pub color: Rgb,
    pub opacity: Opacity,
}

impl Region {
    pub fn rect(rect: Rect, color: Rgb, opacity: Opacity) -> Self {
        Self {
            shape: Shape::Rect(rect),
            color,
            opacity,
        }
    }

    pub fn column(footprint: Rect, height: f32, color: Rgb, opacity: Opacity) -> Self {
        Self {
            shape: Shape::Column {
                footprint,
                height: height.max(0.0),
            },
            color,
            opacity,
        }
    }

    /// Set color, returning `self` for chaining
    pub fn set_color(&mut self, color: Rgb) -> &mut Self {
        self.color = color;
        self
    }

    /// Set opacity, returning `self` for chaining
    pub fn set_opacity(&mut self, opacity: Opacity) -> &mut Self {
        self.opacity = opacity;
        self
    }

    /// Set column height; no effect on flat rectangles
    pub fn set_height(&mut self, new_height: f32) -> &mut Self {
        if let Shape::Column { height, .. } = &mut self.shape {
            *height = new_height.max(0.0);
        }
        self
    }

    /// Footprint in the view plane
    pub fn footprint(&self) -> Rect {
        match self.shape {
            Shape::Rect(rect) | Shape::Column { footprint: rect, .. } => rect,
        }
    }
}

/// Screen corner a label is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Overlay text attached to a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: Anchor,
    pub color: Rgb,
    pub scale: f32,
}

impl Label {
    /// Black label at the bottom-left corner
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: Anchor::BottomLeft,
            color: Rgb::BLACK,
            scale: 0.7,
        }
    }
}
