//! Force Grid Visualizer Core Library
//!
//! Turns raw readings from an intra-oral force sensor sheet into a colored
//! picture. The sheet is a 44 x 52 grid in which only some positions carry a
//! sensor; each frame of readings holds one value per valid position in
//! row-major order.
//!
//! ## Pieces
//!
//! - [`ramp`]: maps a force and a sensitivity divisor to a five-band color
//! - [`grid`]: the flat grid view, recolored in place every step
//! - [`bars`]: the same readings as a field of 3D columns
//! - [`dashboard`] and [`session`]: multi-view composition, playback and
//!   frame export driven by a [`source::ReadingSource`]
//!
//! Nothing here opens a window. Components mutate a [`scene::Scene`]; the
//! software rasterizer in [`export`] or any other surface renders it.

// Core types and utilities
pub mod core_types;
pub mod error;
pub mod profiler;

// Color mapping and sensor layouts
pub mod layout;
pub mod ramp;

// Scene and views
pub mod bars;
pub mod grid;
pub mod scene;

// Data, playback and output
pub mod config;
pub mod dashboard;
pub mod events;
pub mod export;
pub mod history;
pub mod playback;
pub mod session;
pub mod source;

// Re-export core types
pub use core_types::{Force, Opacity, Rgb, Sensitivity, Vec2, Vec3};
pub use error::{Result, VizError};

// Re-export the visualizer surface
pub use bars::BarField;
pub use config::VisualizerConfig;
pub use dashboard::{Dashboard, BAR_VIEW, GRID_VIEW};
pub use grid::{GridGeometry, HardwareGrid, HW_COLS, HW_ROWS};
pub use layout::{count_valid, ArchLayout, FullLayout, MaskLayout, SensorLayout};
pub use ramp::{value_to_color, ColorRamp};
pub use scene::{Scene, ViewId};

// Re-export playback types
pub use export::{Frame, FrameRecorder, ImageSequenceRecorder, MemoryRecorder};
pub use history::{ForceHistory, ForceSample};
pub use playback::{Playback, PlaybackState};
pub use session::{Session, StepReport};
pub use source::{CyclingSource, ReadingSource, SimulatedSource};
