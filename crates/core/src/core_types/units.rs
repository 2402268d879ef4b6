//! Semantic unit types for visual and sensor quantities
//!
//! Newtype wrappers keep raw sensor forces, sensitivity divisors and opacity
//! values from being mixed up at call sites that take several `f64`/`f32`
//! arguments in a row.
//!
//! # Usage
//! ```
//! use force_grid_core::core_types::units::{Force, Opacity, Sensitivity};
//!
//! let force = Force::new(800.0);
//! let sensitivity = Sensitivity::new(2.0);
//! assert_eq!(*force.scaled_by(sensitivity), 400.0);
//!
//! assert_eq!(Opacity::new(1.7), Opacity::OPAQUE);
//! assert_eq!(Opacity::new(-0.5), Opacity::TRANSPARENT);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Compare f32 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f32_total_cmp(a: f32, b: f32) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// SENSOR QUANTITIES (f64, matching the acquisition side)
// ============================================================================

/// Raw force reading reported by one sensor cell
///
/// Unvalidated: hardware may report noise below zero or NaN on a bad frame,
/// and the color ramp handles both.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Force(f64);

impl Eq for Force {}

impl PartialOrd for Force {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Force {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Force {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Force {
    /// Zero force
    pub const ZERO: Force = Force(0.0);

    /// Wrap a raw reading
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Force(value)
    }

    /// Divide by a sensitivity divisor
    #[inline]
    #[must_use]
    pub fn scaled_by(self, sensitivity: Sensitivity) -> Force {
        Force(self.0 / sensitivity.0)
    }

    /// Convert to f32 for rendering math
    #[inline]
    #[must_use]
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

impl From<f64> for Force {
    fn from(v: f64) -> Self {
        Force(v)
    }
}

impl From<Force> for f64 {
    fn from(f: Force) -> f64 {
        f.0
    }
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Sensitivity divisor applied to readings before band mapping
///
/// Only strictly positive, finite values are usable; see [`Sensitivity::is_usable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Sensitivity(f64);

impl Sensitivity {
    /// Unit sensitivity (readings used as-is)
    pub const UNIT: Sensitivity = Sensitivity(1.0);

    /// Wrap a raw divisor
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Sensitivity(value)
    }

    /// Raw divisor
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// True when the divisor is finite and strictly positive
    #[inline]
    #[must_use]
    pub fn is_usable(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::UNIT
    }
}

impl From<f64> for Sensitivity {
    fn from(v: f64) -> Self {
        Sensitivity(v)
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

// ============================================================================
// VISUAL QUANTITIES (f32, matching the rendering side)
// ============================================================================

/// Opacity in [0, 1]; out-of-range input is clamped on construction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Opacity(f32);

impl Eq for Opacity {}

impl PartialOrd for Opacity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Opacity {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Opacity {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl Opacity {
    /// Fully transparent (invalid cells)
    pub const TRANSPARENT: Opacity = Opacity(0.0);
    /// Freshly built valid cell, before any data arrives
    pub const FAINT: Opacity = Opacity(0.1);
    /// Valid cell below the activity threshold, or without data
    pub const DIM: Opacity = Opacity(0.2);
    /// Active cell
    pub const OPAQUE: Opacity = Opacity(1.0);

    /// Create an opacity, clamping to [0, 1]. NaN maps to transparent.
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::TRANSPARENT;
        }
        Opacity(value.clamp(0.0, 1.0))
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// True when nothing of the region is visible
    #[inline]
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.0 <= 0.0
    }
}

impl From<Opacity> for f32 {
    fn from(o: Opacity) -> f32 {
        o.0
    }
}
