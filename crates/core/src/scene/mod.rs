//! Scene graph consumed by the rendering surface
//!
//! The visualizer never draws. It owns a [`Scene`] made of independent
//! [`View`]s and mutates region colors, opacities and labels; a renderer (the
//! frame rasterizer, a terminal UI, or anything else) reads the result.
//!
//! There is no "active view": every component is handed the scene and looks up
//! its own [`ViewId`] on each call.

pub mod camera;
pub mod region;
pub mod view;

pub use camera::Camera;
pub use region::{Anchor, Label, LabelId, Rect, Region, RegionId, Shape};
pub use view::{View, ViewId};

/// Fixed set of sub-views laid out side by side
#[derive(Debug, Clone)]
pub struct Scene {
    views: Vec<View>,
}

impl Scene {
    /// Scene with `count` empty views, ids `0..count`
    pub fn new(count: usize) -> Self {
        Self {
            views: (0..count).map(|i| View::new(ViewId(i))).collect(),
        }
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id.0)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(id.0)
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Total regions across all views
    pub fn region_count(&self) -> usize {
        self.views.iter().map(View::region_count).sum()
    }
}
