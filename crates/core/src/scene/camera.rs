//! Parallel-projection camera for a view.

use crate::core_types::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Orthographic camera looking down the z axis
///
/// `tilt` rotates the camera about the x axis (radians): 0 is a straight
/// top-down view, larger values lean back so column heights become visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub focal_point: Vec2,
    /// Half the visible height, in world units
    pub parallel_scale: f32,
    pub tilt: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focal_point: Vec2::zeros(),
            parallel_scale: 1.0,
            tilt: 0.0,
        }
    }
}

impl Camera {
    /// Top-down camera framing an extent of `height` world units centered at the origin
    ///
    /// `zoom` divides the height to get the parallel scale (1.9 leaves a small margin).
    pub fn framing(height: f32, zoom: f32) -> Self {
        Self {
            focal_point: Vec2::zeros(),
            parallel_scale: (height / zoom).max(f32::EPSILON),
            tilt: 0.0,
        }
    }

    /// Same framing leaned back by `tilt` radians
    pub fn tilted(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    /// Project a world point (ground plane xy, height z) to the view plane
    pub fn project(&self, p: Vec3) -> Vec2 {
        Vec2::new(p.x, p.y * self.tilt.cos() + p.z * self.tilt.sin())
    }

    /// Pixels per world unit for a viewport of the given pixel height
    fn pixels_per_unit(&self, viewport_height: u32) -> f32 {
        viewport_height as f32 / (2.0 * self.parallel_scale)
    }

    /// View-plane point to viewport pixel coordinates (origin top-left, y down)
    pub fn world_to_viewport(&self, p: Vec2, viewport: (u32, u32)) -> Vec2 {
        let scale = self.pixels_per_unit(viewport.1);
        Vec2::new(
            viewport.0 as f32 / 2.0 + (p.x - self.focal_point.x) * scale,
            viewport.1 as f32 / 2.0 - (p.y - self.focal_point.y) * scale,
        )
    }

    /// Inverse of [`Camera::world_to_viewport`]
    pub fn viewport_to_world(&self, px: Vec2, viewport: (u32, u32)) -> Vec2 {
        let scale = self.pixels_per_unit(viewport.1);
        Vec2::new(
            (px.x - viewport.0 as f32 / 2.0) / scale + self.focal_point.x,
            (viewport.1 as f32 / 2.0 - px.y) / scale + self.focal_point.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_viewport_round_trip_center() {
        let cam = Camera::framing(11.0, 1.9);
        let px = cam.world_to_viewport(Vec2::zeros(), (800, 600));
        assert_relative_eq!(px.x, 400.0);
        assert_relative_eq!(px.y, 300.0);

        let back = cam.viewport_to_world(Vec2::new(123.0, 456.0), (800, 600));
        let again = cam.world_to_viewport(back, (800, 600));
        assert_relative_eq!(again.x, 123.0, epsilon = 1e-3);
        assert_relative_eq!(again.y, 456.0, epsilon = 1e-3);
    }

    #[test]
    fn test_up_is_up() {
        let cam = Camera::default();
        let top = cam.world_to_viewport(Vec2::new(0.0, 0.5), (100, 100));
        let bottom = cam.world_to_viewport(Vec2::new(0.0, -0.5), (100, 100));
        assert!(top.y < bottom.y);
    }

    #[test]
    fn test_tilt_reveals_height() {
        let flat = Camera::default();
        assert_eq!(flat.project(Vec3::new(1.0, 2.0, 5.0)), Vec2::new(1.0, 2.0));

        let leaned = Camera::default().tilted(std::f32::consts::FRAC_PI_3);
        let base = leaned.project(Vec3::new(0.0, 0.0, 0.0));
        let top = leaned.project(Vec3::new(0.0, 0.0, 1.0));
        assert!(top.y > base.y);
    }
}
