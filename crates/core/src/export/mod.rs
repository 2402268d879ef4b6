//! Frame export: rasterize the scene and hand frames to a recorder
pub mod raster;
pub mod recorder;

pub use raster::{compose, render_history, render_view, CanvasLayout, Frame, PixelRect};
pub use recorder::{FrameRecorder, ImageSequenceRecorder, MemoryRecorder};
