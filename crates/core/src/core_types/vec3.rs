//! Vector type aliases for scene positions.

use nalgebra::{Vector2, Vector3};

/// 2D vector for flat scene coordinates (grid cell centers, rectangle corners).
///
/// Alias for `nalgebra::Vector2<f32>`; the vertical axis increases upward.
pub type Vec2 = Vector2<f32>;

/// 3D vector for bar-field positions and extents.
pub type Vec3 = Vector3<f32>;
