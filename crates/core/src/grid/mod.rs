//! Sensor grid: geometry, valid-cell scanning and the 2D grid view

pub mod geometry;
pub mod hardware_grid;
pub mod scan;

// Re-export main types
pub use geometry::{GridGeometry, HW_COLS, HW_ROWS};
pub use hardware_grid::{CellKey, HardwareGrid, DEFAULT_ACTIVE_THRESHOLD, GRID_BACKGROUND};
pub use scan::{scan_valid, CellReading};
